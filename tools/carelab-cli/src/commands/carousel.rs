//! Interactive carousel over the offer slides.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use carelab_catalog::carousel::{Carousel, Slide};
use carelab_catalog::catalog::Catalog;
use carelab_common::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    Jump(usize),
    Quit,
}

/// Parse one line: `n`, `p`, a one-based slide number, or `q`.
fn parse_input(line: &str, slide_count: usize) -> Option<Input> {
    match line.trim() {
        "n" | "next" | "" => Some(Input::Next),
        "p" | "prev" | "previous" => Some(Input::Previous),
        "q" | "quit" | "exit" => Some(Input::Quit),
        other => match other.parse::<usize>() {
            Ok(n) if (1..=slide_count).contains(&n) => Some(Input::Jump(n - 1)),
            _ => None,
        },
    }
}

fn indicator_row(carousel: &Carousel) -> String {
    carousel
        .indicators()
        .iter()
        .map(|i| match (i.active, i.contact) {
            (true, _) => "●",
            (false, true) => "◆",
            (false, false) => "○",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text rendering of the current slide.
fn describe(catalog: &Catalog, carousel: &Carousel) -> String {
    let mut out = String::new();
    match carousel.current() {
        Slide::Package(position) => {
            if let Some(p) = catalog.get(position) {
                out.push_str(&format!("{}  [{}]\n", p.title, p.icon_type));
                for item in &p.items {
                    out.push_str(&format!("  ✓ {item}\n"));
                }
                out.push_str(&format!(
                    "  {} ج.م  (بدلاً من {} ج.م, خصم {}%)\n",
                    p.price,
                    p.old_price,
                    p.discount_percent()
                ));
            }
        }
        Slide::CallToAction => {
            out.push_str(&format!("العرض ساري حتى {}\n", catalog.offer_deadline));
            out.push_str(&format!("  احجز الآن: {}\n", catalog.contact.phone));
            out.push_str(&format!("  واتساب: {}\n", catalog.contact.whatsapp_link()));
            out.push_str(&format!("  {}\n", catalog.contact.slogan));
        }
    }
    out.push_str(&format!(
        "{}   {}\n",
        carousel.position_label(),
        indicator_row(carousel)
    ));
    out
}

pub fn run(config: &AppConfig, start: usize, catalog: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = super::load_catalog(catalog, config)?;
    let mut carousel = Carousel::new(catalog.len());
    if start == 0 || start > carousel.slide_count() {
        anyhow::bail!(
            "Start slide {start} out of range (1..={})",
            carousel.slide_count()
        );
    }
    carousel.jump_to(start - 1);

    println!("{} - {}", catalog.lab_name, catalog.headline);
    println!("Commands: n (next), p (previous), 1-{} (jump), q (quit)", carousel.slide_count());
    println!();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", describe(&catalog, &carousel));
        std::io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        match parse_input(&line?, carousel.slide_count()) {
            Some(Input::Next) => carousel.next(),
            Some(Input::Previous) => carousel.previous(),
            Some(Input::Jump(target)) => carousel.jump_to(target),
            Some(Input::Quit) => break,
            None => println!("  Unknown command"),
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("n", 11), Some(Input::Next));
        assert_eq!(parse_input(" p ", 11), Some(Input::Previous));
        assert_eq!(parse_input("11", 11), Some(Input::Jump(10)));
        assert_eq!(parse_input("12", 11), None);
        assert_eq!(parse_input("0", 11), None);
        assert_eq!(parse_input("q", 11), Some(Input::Quit));
    }

    #[test]
    fn test_describe_package_and_cta() {
        let catalog = Catalog::builtin();
        let mut carousel = Carousel::new(catalog.len());

        let first = describe(&catalog, &carousel);
        assert!(first.contains(&catalog.packages[0].title));
        assert!(first.contains("باقة 1 من 10"));
        assert!(first.starts_with(&catalog.packages[0].title));

        carousel.previous();
        let cta = describe(&catalog, &carousel);
        assert!(cta.contains("تواصل معنا"));
        assert!(cta.contains("https://wa.me/2001096377849"));
    }

    #[test]
    fn test_indicator_row_marks_active_and_contact() {
        let mut carousel = Carousel::new(2);
        assert_eq!(indicator_row(&carousel), "● ○ ◆");
        carousel.jump_to(2);
        assert_eq!(indicator_row(&carousel), "○ ○ ●");
    }
}

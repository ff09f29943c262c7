//! Show catalog information.

use std::path::PathBuf;

use carelab_common::config::AppConfig;
use carelab_render::ExportKind;

pub fn run(config: &AppConfig, catalog: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = super::load_catalog(catalog, config)?;

    println!("Catalog: {} ({})", catalog.brand, catalog.lab_name);
    println!("  Headline: {}", catalog.headline);
    println!("  Offer valid until: {}", catalog.offer_deadline);
    println!("  Slides: {} packages + 1 contact", catalog.len());
    println!();

    println!("Packages:");
    for (i, p) in catalog.iter().enumerate() {
        println!(
            "  {:>2}. {} - {} EGP (was {}, -{}%) [{} tests, {}]",
            i + 1,
            p.title,
            p.price,
            p.old_price,
            p.discount_percent(),
            p.items.len(),
            p.icon_type.label()
        );
    }
    println!();

    println!("Contact:");
    println!("  Phone: {}", catalog.contact.phone);
    println!("  WhatsApp: {}", catalog.contact.whatsapp_link());
    println!("  Address: {}", catalog.contact.address);
    println!();

    println!("Exports:");
    for kind in ExportKind::ALL {
        println!("  {:<8} {}", kind.as_str(), kind.artifact_name(&catalog));
    }
    println!("  Output directory: {}", config.output_dir.display());

    Ok(())
}

//! Off-screen layout nodes: one per package plus one CTA node.
//!
//! A node carries every string a renderer needs, already resolved for its
//! target, so the capture backend never looks back into the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PackageRecord};

/// Physical layout a node is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutTarget {
    /// A4 portrait page at 96 dpi, used for the document export.
    PrintPage,
    /// 9:16 vertical frame, used for the video and the still images.
    Reel,
}

impl LayoutTarget {
    /// Node size in layout pixels (before capture scaling).
    pub fn size(self) -> (u32, u32) {
        match self {
            LayoutTarget::PrintPage => (794, 1123),
            LayoutTarget::Reel => (1080, 1920),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutTarget::PrintPage => "print_page",
            LayoutTarget::Reel => "reel",
        }
    }
}

/// Copy shown on the closing slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToActionCopy {
    pub valid_until_label: String,
    pub offer_deadline: String,
    pub book_now_label: String,
    pub phone: String,
    pub whatsapp_label: String,
    pub whatsapp_link: String,
    pub closing_line: String,
}

/// Main body of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Package(PackageRecord),
    CallToAction(CallToActionCopy),
}

/// Bottom band of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFooter {
    /// Phone and address side by side (package pages).
    Contact {
        phone_label: String,
        phone: String,
        address_label: String,
        address: String,
    },
    /// A single centered line.
    Caption(String),
}

/// One slide laid out for a target, ready to be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNode {
    /// Zero-based position in the deck; the CTA node is last.
    pub position: usize,
    pub target: LayoutTarget,
    pub header_title: String,
    pub header_subtitle: Option<String>,
    /// Diagonal watermark drawn behind package cards.
    pub watermark: String,
    pub content: NodeContent,
    pub footer: NodeFooter,
}

impl LayoutNode {
    pub fn is_call_to_action(&self) -> bool {
        matches!(self.content, NodeContent::CallToAction(_))
    }

    /// Package shown by this node, if any.
    pub fn package(&self) -> Option<&PackageRecord> {
        match &self.content {
            NodeContent::Package(package) => Some(package),
            NodeContent::CallToAction(_) => None,
        }
    }
}

/// Build the node sequence for `target`: every package in catalog order,
/// then the CTA node. The sequence always has `N + 1` entries.
pub fn layout_nodes(catalog: &Catalog, target: LayoutTarget) -> Vec<LayoutNode> {
    layout_nodes_with_year(catalog, target, carelab_common::current_year())
}

/// Same as [`layout_nodes`] with an explicit year for the print CTA footer.
pub fn layout_nodes_with_year(
    catalog: &Catalog,
    target: LayoutTarget,
    footer_year: i32,
) -> Vec<LayoutNode> {
    let contact_footer = NodeFooter::Contact {
        phone_label: "اتصل بنا".to_string(),
        phone: catalog.contact.phone.clone(),
        address_label: "العنوان".to_string(),
        address: catalog.contact.address.clone(),
    };

    let package_subtitle = match target {
        LayoutTarget::PrintPage => catalog.headline.clone(),
        LayoutTarget::Reel => format!("عروض {}", catalog.contact.year),
    };

    let mut nodes: Vec<LayoutNode> = catalog
        .iter()
        .enumerate()
        .map(|(position, package)| LayoutNode {
            position,
            target,
            header_title: catalog.lab_name.clone(),
            header_subtitle: Some(package_subtitle.clone()),
            watermark: catalog.lab_name.clone(),
            content: NodeContent::Package(package.clone()),
            footer: contact_footer.clone(),
        })
        .collect();

    let (cta_subtitle, cta_footer) = match target {
        LayoutTarget::PrintPage => (
            Some(catalog.contact.slogan.clone()),
            NodeFooter::Caption(format!("{} - {}", catalog.lab_name, footer_year)),
        ),
        LayoutTarget::Reel => (None, NodeFooter::Caption(catalog.contact.slogan.clone())),
    };

    nodes.push(LayoutNode {
        position: catalog.len(),
        target,
        header_title: catalog.lab_name.clone(),
        header_subtitle: cta_subtitle,
        watermark: catalog.lab_name.clone(),
        content: NodeContent::CallToAction(CallToActionCopy {
            valid_until_label: "العرض ساري حتى".to_string(),
            offer_deadline: catalog.offer_deadline.clone(),
            book_now_label: "احجز دلوقتي".to_string(),
            phone: catalog.contact.phone.clone(),
            whatsapp_label: "تواصل معنا عبر واتساب".to_string(),
            whatsapp_link: catalog.contact.whatsapp_link(),
            closing_line: format!("{} – {}", catalog.lab_name, catalog.contact.slogan),
        }),
        footer: cta_footer,
    });

    nodes
}

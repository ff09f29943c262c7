//! Package catalog: the discounted lab-test bundles and the contact record.
//!
//! A catalog is loaded once at start-up, validated, and never mutated
//! afterwards. The built-in catalog mirrors the campaign that ships with
//! the binary; a JSON file with the same shape can replace it.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The ten package categories. Each maps to a fixed accent gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    General,
    Child,
    Diabetes,
    Thyroid,
    Thin,
    Obesity,
    Pregnancy,
    Hair,
    Minerals,
    Fertility,
}

impl IconType {
    pub const ALL: [IconType; 10] = [
        IconType::General,
        IconType::Child,
        IconType::Diabetes,
        IconType::Thyroid,
        IconType::Thin,
        IconType::Obesity,
        IconType::Pregnancy,
        IconType::Hair,
        IconType::Minerals,
        IconType::Fertility,
    ];

    /// Serialized tag.
    pub fn as_str(self) -> &'static str {
        match self {
            IconType::General => "general",
            IconType::Child => "child",
            IconType::Diabetes => "diabetes",
            IconType::Thyroid => "thyroid",
            IconType::Thin => "thin",
            IconType::Obesity => "obesity",
            IconType::Pregnancy => "pregnancy",
            IconType::Hair => "hair",
            IconType::Minerals => "minerals",
            IconType::Fertility => "fertility",
        }
    }

    /// Human-readable category.
    pub fn label(self) -> &'static str {
        match self {
            IconType::General => "General health",
            IconType::Child => "Children",
            IconType::Diabetes => "Diabetes",
            IconType::Thyroid => "Thyroid",
            IconType::Thin => "Underweight",
            IconType::Obesity => "Weight management",
            IconType::Pregnancy => "Pregnancy",
            IconType::Hair => "Hair loss",
            IconType::Minerals => "Vitamins & minerals",
            IconType::Fertility => "Fertility",
        }
    }

    /// Two-stop accent gradient (start, end) as sRGB triples.
    pub fn gradient(self) -> ([u8; 3], [u8; 3]) {
        match self {
            IconType::General => ([0x3b, 0x82, 0xf6], [0x06, 0xb6, 0xd4]),
            IconType::Child => ([0x22, 0xc5, 0x5e], [0x10, 0xb9, 0x81]),
            IconType::Diabetes => ([0xef, 0x44, 0x44], [0xf4, 0x3f, 0x5e]),
            IconType::Thyroid => ([0xa8, 0x55, 0xf7], [0x8b, 0x5c, 0xf6]),
            IconType::Thin => ([0xfb, 0x92, 0x3c], [0xf5, 0x9e, 0x0b]),
            IconType::Obesity => ([0xea, 0xb3, 0x08], [0xf9, 0x73, 0x16]),
            IconType::Pregnancy => ([0xec, 0x48, 0x99], [0xfb, 0x71, 0x85]),
            IconType::Hair => ([0x63, 0x66, 0xf1], [0x25, 0x63, 0xeb]),
            IconType::Minerals => ([0x14, 0xb8, 0xa6], [0x05, 0x96, 0x69]),
            IconType::Fertility => ([0xc0, 0x26, 0xd3], [0xdb, 0x27, 0x77]),
        }
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discounted bundle of lab tests, shown as one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Unique, stable identifier.
    pub id: u32,
    pub title: String,
    /// Tests in display order.
    pub items: Vec<String>,
    pub price: u32,
    pub old_price: u32,
    pub icon_type: IconType,
    pub color_theme: String,
}

impl PackageRecord {
    /// Discount shown on the badge, rounded half-up to a whole percent.
    ///
    /// Negative when `price > old_price`; such records never pass
    /// [`Catalog::validate`].
    pub fn discount_percent(&self) -> i64 {
        if self.old_price == 0 {
            return 0;
        }
        let ratio = (self.old_price as f64 - self.price as f64) / self.old_price as f64;
        (ratio * 100.0 + 0.5).floor() as i64
    }
}

/// Contact details printed on every slide footer and on the CTA slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub address: String,
    pub slogan: String,
    pub year: String,
}

impl ContactInfo {
    /// WhatsApp deep link for the phone number (Egyptian country code).
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/20{}", self.phone)
    }
}

/// The whole campaign: packages in slide order plus the shared copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Latin brand used in artifact file names.
    pub brand: String,
    /// Display name of the laboratory.
    pub lab_name: String,
    /// Campaign headline printed in slide headers.
    pub headline: String,
    /// "Offer valid until" text on the CTA slide.
    pub offer_deadline: String,
    pub packages: Vec<PackageRecord>,
    pub contact: ContactInfo,
}

impl Catalog {
    /// Number of packages (`N`). The deck has `N + 1` slides.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Slides in the deck, including the trailing CTA slide.
    pub fn slide_count(&self) -> usize {
        self.packages.len() + 1
    }

    /// Package at a zero-based catalog position.
    pub fn get(&self, position: usize) -> Option<&PackageRecord> {
        self.packages.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageRecord> {
        self.packages.iter()
    }

    /// Load a catalog from JSON and validate it.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|e| CatalogError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        catalog.validate()?;
        tracing::debug!(
            path = %path.display(),
            packages = catalog.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise return the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Every problem found in the catalog, in catalog order.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = vec![];

        if self.packages.is_empty() {
            issues.push("Catalog has no packages".to_string());
        }
        if self.brand.trim().is_empty() {
            issues.push("Brand is empty".to_string());
        }
        if self.contact.phone.trim().is_empty() {
            issues.push("Contact phone is empty".to_string());
        }

        let mut seen = HashSet::new();
        for (position, package) in self.packages.iter().enumerate() {
            let label = format!("Package {} (id {})", position + 1, package.id);
            if !seen.insert(package.id) {
                issues.push(format!("{label}: duplicate id"));
            }
            if package.title.trim().is_empty() {
                issues.push(format!("{label}: empty title"));
            }
            if package.items.is_empty() {
                issues.push(format!("{label}: no items"));
            }
            if package.old_price == 0 {
                issues.push(format!("{label}: old price is zero"));
            } else if package.price > package.old_price {
                issues.push(format!(
                    "{label}: price {} exceeds old price {}",
                    package.price, package.old_price
                ));
            }
        }

        issues
    }

    /// Reject catalogs that would render nonsensical slides.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::ValidationError {
                message: issues.join("; "),
            })
        }
    }

    /// The campaign bundled with the application.
    pub fn builtin() -> Self {
        fn package(
            id: u32,
            title: &str,
            items: &[&str],
            price: u32,
            old_price: u32,
            icon_type: IconType,
            color_theme: &str,
        ) -> PackageRecord {
            PackageRecord {
                id,
                title: title.to_string(),
                items: items.iter().map(|item| item.to_string()).collect(),
                price,
                old_price,
                icon_type,
                color_theme: color_theme.to_string(),
            }
        }

        Self {
            brand: "CareLab".to_string(),
            lab_name: "معمل كير لاب".to_string(),
            headline: "خصومات رأس السنة 2025".to_string(),
            offer_deadline: "31 يناير 2025".to_string(),
            packages: vec![
                package(
                    1,
                    "باقة التحاليل الشاملة",
                    &[
                        "صورة الدم",
                        "وظائف الكبد",
                        "وظائف الكلى",
                        "الغدة الدرقية",
                        "مستوى الكوليسترول",
                        "فيروس سي",
                        "سكر عشوائي",
                        "بول وبراز",
                    ],
                    800,
                    950,
                    IconType::General,
                    "blue",
                ),
                package(
                    2,
                    "باقة اطمن على طفلك",
                    &[
                        "صورة الدم",
                        "سكر عشوائي",
                        "سرعة الترسيب",
                        "CRP",
                        "كالسيوم",
                        "بول وبراز",
                    ],
                    350,
                    550,
                    IconType::Child,
                    "green",
                ),
                package(
                    3,
                    "باقة متابعة السكر",
                    &["سكر صايم", "سكر فاطر", "سكر تراكمي"],
                    150,
                    210,
                    IconType::Diabetes,
                    "red",
                ),
                package(
                    4,
                    "باقة هرمونات الغدة",
                    &["TSH", "T3", "T4"],
                    300,
                    450,
                    IconType::Thyroid,
                    "purple",
                ),
                package(
                    5,
                    "باقة النحافة",
                    &[
                        "صورة الدم",
                        "غدة درقية",
                        "سكر عشوائي",
                        "جرثومة المعدة",
                        "براز",
                    ],
                    300,
                    460,
                    IconType::Thin,
                    "orange",
                ),
                package(
                    6,
                    "باقة السمنة",
                    &[
                        "صورة الدم",
                        "غدة درقية",
                        "وظائف الكبد",
                        "ملف دهون كامل",
                        "مقاومة الإنسولين",
                        "فيتامين د",
                    ],
                    1000,
                    1250,
                    IconType::Obesity,
                    "amber",
                ),
                package(
                    7,
                    "باقة متابعة الحمل",
                    &[
                        "صورة الدم",
                        "فصيلة الدم",
                        "سكر عشوائي",
                        "غدة درقية",
                        "بول",
                    ],
                    300,
                    380,
                    IconType::Pregnancy,
                    "pink",
                ),
                package(
                    8,
                    "باقة تساقط الشعر",
                    &["صورة الدم", "مخزون الحديد", "غدة درقية", "فيتامين د"],
                    650,
                    800,
                    IconType::Hair,
                    "indigo",
                ),
                package(
                    9,
                    "باقة المعادن",
                    &["كالسيوم", "ماغنسيوم", "بوتاسيوم", "صوديوم", "فوسفور", "زينك"],
                    700,
                    950,
                    IconType::Minerals,
                    "teal",
                ),
                package(
                    10,
                    "باقة تأخر الحمل",
                    &["صورة الدم", "FSH", "LH", "TSH", "AMH", "PRL", "TESTO"],
                    1300,
                    1500,
                    IconType::Fertility,
                    "rose",
                ),
            ],
            contact: ContactInfo {
                phone: "01096377849".to_string(),
                address: "معمل كير لاب".to_string(),
                slogan: "صحتك تهمنا".to_string(),
                year: "2025".to_string(),
            },
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PackageRecord;
    type IntoIter = std::slice::Iter<'a, PackageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

/// Errors that can occur when loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid catalog: {message}")]
    ValidationError { message: String },
}

impl From<CatalogError> for carelab_common::CarelabError {
    fn from(err: CatalogError) -> Self {
        carelab_common::CarelabError::catalog(err.to_string())
    }
}

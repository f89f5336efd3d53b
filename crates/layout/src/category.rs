use std::fmt;
use std::str::FromStr;

use adframe_core::LayoutError;
use serde::{Deserialize, Serialize};

/// The kind of visual element placed in a frame.
///
/// Serialized with its human-readable label (e.g. `"CTA Button"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Background,
    Logo,
    CtaButton,
    Icon,
    ProductImage,
    TextElements,
    Infographic,
    Banner,
    Illustration,
    Photograph,
    Mascot,
    TestimonialQuotes,
    SocialProof,
    SealOrBadge,
    GraphsAndCharts,
    DecorativeElements,
    InteractiveElements,
    Animation,
    CouponOrOfferCode,
    LegalDisclaimers,
    ContactInformation,
    MapOrLocationImage,
    QrCode,
}

impl Category {
    pub const ALL: [Category; 23] = [
        Category::Background,
        Category::Logo,
        Category::CtaButton,
        Category::Icon,
        Category::ProductImage,
        Category::TextElements,
        Category::Infographic,
        Category::Banner,
        Category::Illustration,
        Category::Photograph,
        Category::Mascot,
        Category::TestimonialQuotes,
        Category::SocialProof,
        Category::SealOrBadge,
        Category::GraphsAndCharts,
        Category::DecorativeElements,
        Category::InteractiveElements,
        Category::Animation,
        Category::CouponOrOfferCode,
        Category::LegalDisclaimers,
        Category::ContactInformation,
        Category::MapOrLocationImage,
        Category::QrCode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Background => "Background",
            Category::Logo => "Logo",
            Category::CtaButton => "CTA Button",
            Category::Icon => "Icon",
            Category::ProductImage => "Product Image",
            Category::TextElements => "Text Elements",
            Category::Infographic => "Infographic",
            Category::Banner => "Banner",
            Category::Illustration => "Illustration",
            Category::Photograph => "Photograph",
            Category::Mascot => "Mascot",
            Category::TestimonialQuotes => "Testimonial Quotes",
            Category::SocialProof => "Social Proof",
            Category::SealOrBadge => "Seal or Badge",
            Category::GraphsAndCharts => "Graphs and Charts",
            Category::DecorativeElements => "Decorative Elements",
            Category::InteractiveElements => "Interactive Elements",
            Category::Animation => "Animation",
            Category::CouponOrOfferCode => "Coupon or Offer Code",
            Category::LegalDisclaimers => "Legal Disclaimers or Terms",
            Category::ContactInformation => "Contact Information",
            Category::MapOrLocationImage => "Map or Location Image",
            Category::QrCode => "QR Code",
        }
    }

    pub fn is_background(self) -> bool {
        self == Category::Background
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| LayoutError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

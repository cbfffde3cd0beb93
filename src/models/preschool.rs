//! Preschool records and the card/detail projections rendered from them

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::Coordinates;

/// Number of specialties shown on a card before collapsing into `+N`
pub const CARD_SPECIALTY_LIMIT: usize = 2;

/// A preschool entry of the static dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preschool {
    pub id: String,
    pub name: String,
    pub address: String,
    pub municipality: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub description: String,
    pub age_range: String,
    pub capacity: u32,
    pub opening_hours: String,
    pub languages: Vec<String>,
    pub specialties: Vec<String>,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Preschool {
    /// Rating as shown on badges and markers (`4.8`, `4`)
    #[must_use]
    pub fn rating_label(&self) -> String {
        format_rating(self.rating)
    }

    /// `tel:` link for the phone number, if any
    #[must_use]
    pub fn phone_link(&self) -> Option<String> {
        self.phone.as_ref().map(|phone| format!("tel:{phone}"))
    }

    /// `mailto:` link for the e-mail address, if any
    #[must_use]
    pub fn email_link(&self) -> Option<String> {
        self.email.as_ref().map(|email| format!("mailto:{email}"))
    }
}

/// Format a rating the way the badges print it
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{rating}")
}

/// Summary shown in the result list and in marker popups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreschoolCard {
    pub id: String,
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub rating_label: String,
    pub description: String,
    pub age_range: String,
    pub opening_hours: String,
    /// First specialties, capped at [`CARD_SPECIALTY_LIMIT`]
    pub specialties: Vec<String>,
    /// Specialties not shown on the card
    pub more_specialties: usize,
    pub phone_link: Option<String>,
    pub selected: bool,
}

impl PreschoolCard {
    #[must_use]
    pub fn new(preschool: &Preschool, selected: bool) -> Self {
        Self {
            id: preschool.id.clone(),
            name: preschool.name.clone(),
            address: preschool.address.clone(),
            rating: preschool.rating,
            rating_label: preschool.rating_label(),
            description: preschool.description.clone(),
            age_range: preschool.age_range.clone(),
            opening_hours: preschool.opening_hours.clone(),
            specialties: preschool
                .specialties
                .iter()
                .take(CARD_SPECIALTY_LIMIT)
                .cloned()
                .collect(),
            more_specialties: preschool
                .specialties
                .len()
                .saturating_sub(CARD_SPECIALTY_LIMIT),
            phone_link: preschool.phone_link(),
            selected,
        }
    }
}

impl Display for PreschoolCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.selected { "▶" } else { " " };
        writeln!(f, "{marker} {} ⭐ {}  [{}]", self.name, self.rating_label, self.id)?;
        writeln!(f, "   📍 {}", self.address)?;
        writeln!(f, "   👥 {}   🕒 {}", self.age_range, self.opening_hours)?;
        if !self.specialties.is_empty() {
            write!(f, "   🏷️ {}", self.specialties.join(", "))?;
            if self.more_specialties > 0 {
                write!(f, " +{}", self.more_specialties)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Every field of a record, as rendered in the detail overlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreschoolDetail {
    pub id: String,
    pub name: String,
    pub address: String,
    pub municipality: String,
    pub coordinates: Coordinates,
    pub rating: f64,
    pub rating_label: String,
    pub description: String,
    pub age_range: String,
    pub capacity: u32,
    pub capacity_label: String,
    pub opening_hours: String,
    pub phone: Option<String>,
    pub phone_link: Option<String>,
    pub email: Option<String>,
    pub email_link: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
}

impl From<&Preschool> for PreschoolDetail {
    fn from(preschool: &Preschool) -> Self {
        Self {
            id: preschool.id.clone(),
            name: preschool.name.clone(),
            address: preschool.address.clone(),
            municipality: preschool.municipality.clone(),
            coordinates: preschool.coordinates,
            rating: preschool.rating,
            rating_label: preschool.rating_label(),
            description: preschool.description.clone(),
            age_range: preschool.age_range.clone(),
            capacity: preschool.capacity,
            capacity_label: format!("{} barn", preschool.capacity),
            opening_hours: preschool.opening_hours.clone(),
            phone: preschool.phone.clone(),
            phone_link: preschool.phone_link(),
            email: preschool.email.clone(),
            email_link: preschool.email_link(),
            website: preschool.website.clone(),
            image_url: preschool.image_url.clone(),
            specialties: preschool.specialties.clone(),
            languages: preschool.languages.clone(),
        }
    }
}

impl Display for PreschoolDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "   📍 {}", self.address)?;
        writeln!(f, "   ⭐ {}   🏛️ {}", self.rating_label, self.municipality)?;
        writeln!(f)?;
        writeln!(f, "   {}", self.description)?;
        writeln!(f)?;
        writeln!(f, "   Åldersgrupp: {}", self.age_range)?;
        writeln!(f, "   Kapacitet:   {}", self.capacity_label)?;
        writeln!(f, "   Öppettider:  {}", self.opening_hours)?;
        if let Some(phone) = &self.phone {
            writeln!(f, "   Telefon:     {phone}")?;
        }
        if let Some(email) = &self.email {
            writeln!(f, "   E-post:      {email}")?;
        }
        if let Some(website) = &self.website {
            writeln!(f, "   Hemsida:     {website}")?;
        }
        writeln!(f, "   Specialiteter: {}", self.specialties.join(", "))?;
        writeln!(f, "   Språk:         {}", self.languages.join(", "))?;
        Ok(())
    }
}

//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Fund.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Avatar assigned to users who never uploaded one.
pub const DEFAULT_USER_IMAGE_URL: &str = "https://i.imgur.com/rfxjQeS.png";

/// The fixed set of project categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Art,
    Fashion,
    Film,
    Food,
    Games,
    Technology,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Art,
        Category::Fashion,
        Category::Film,
        Category::Food,
        Category::Games,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Art => "Art",
            Category::Fashion => "Fashion",
            Category::Film => "Film",
            Category::Food => "Food",
            Category::Games => "Games",
            Category::Technology => "Technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Case-sensitive: "art" is not a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("unknown category '{s}'")))
    }
}

/// A fundable campaign with a target amount and a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// The creator
    pub user_id: Uuid,
    pub category: Category,
    pub title: String,
    pub short_blurb: String,
    pub description: String,
    pub image_url: String,
    /// Funding target; validated > 0 before it ever reaches storage
    pub funding_amount: i64,
    pub funding_end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether `needle` occurs in the title or short blurb, ignoring case.
    /// Case folding is Unicode-aware; `needle` is matched literally.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.short_blurb.to_lowercase().contains(&needle)
    }
}

/// A pledge tier belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Price of this tier
    pub amount: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// One user pledging to one reward tier. Unique per (user, reward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backing {
    pub id: Uuid,
    pub reward_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image_url: String,
    #[serde(skip_serializing, default)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

/// Category selection for discovery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(*c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

/// Orderings offered by discovery listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Random,
    /// Ascending funding_amount
    FundingGoal,
    /// Soonest-ending first
    EndDate,
    /// Most recently created first
    Newest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Random => "Random",
            SortKey::FundingGoal => "Funding Goal",
            SortKey::EndDate => "End Date",
            SortKey::Newest => "Newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Random" => Ok(SortKey::Random),
            "Funding Goal" => Ok(SortKey::FundingGoal),
            "End Date" => Ok(SortKey::EndDate),
            "Newest" => Ok(SortKey::Newest),
            other => Err(AppError::ValidationError(format!("unknown sort '{other}'"))),
        }
    }
}

/// Predicates, ordering and limit for a project listing query.
///
/// Every `Some` predicate narrows the result. `text` matches a
/// case-insensitive substring of the title OR the short blurb.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectQuery {
    pub category: Option<Category>,
    pub text: Option<String>,
    /// `None` leaves rows in storage order
    pub sort: Option<SortKey>,
    pub limit: Option<u32>,
}

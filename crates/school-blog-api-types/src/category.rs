use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed tag set used to file and filter posts.
///
/// The serialized form is the human label the service stores verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "News")]
    News,
    #[serde(rename = "Community")]
    Community,
    #[serde(rename = "Learning")]
    Learning,
    #[serde(rename = "Culture")]
    Culture,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Student Spotlights")]
    StudentSpotlights,
    #[serde(rename = "Career and Future")]
    CareerAndFuture,
    #[serde(rename = "Technology and Innovation")]
    TechnologyAndInnovation,
    #[serde(rename = "Health and Well-being")]
    HealthAndWellBeing,
}

impl Category {
    /// Every category, in the order the tag bar presents them.
    pub const ALL: [Category; 9] = [
        Category::News,
        Category::Community,
        Category::Learning,
        Category::Culture,
        Category::Sports,
        Category::StudentSpotlights,
        Category::CareerAndFuture,
        Category::TechnologyAndInnovation,
        Category::HealthAndWellBeing,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Community => "Community",
            Category::Learning => "Learning",
            Category::Culture => "Culture",
            Category::Sports => "Sports",
            Category::StudentSpotlights => "Student Spotlights",
            Category::CareerAndFuture => "Career and Future",
            Category::TechnologyAndInnovation => "Technology and Innovation",
            Category::HealthAndWellBeing => "Health and Well-being",
        }
    }

    /// Kebab-case form, convenient on a command line.
    #[must_use]
    pub fn slug(self) -> String {
        self.label().to_ascii_lowercase().replace(' ', "-")
    }

    /// Badge colour for the category tile.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Category::News => "#4A148C",
            Category::Community => "#8B0000",
            Category::Learning => "#34495E",
            Category::Culture => "#A52A2A",
            Category::Sports => "#216953",
            Category::StudentSpotlights => "#AE650C",
            Category::CareerAndFuture => "#C2185B",
            Category::TechnologyAndInnovation => "#1C78D2",
            Category::HealthAndWellBeing => "#58830A",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.label().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

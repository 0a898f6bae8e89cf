// Explicit user context. Components that need identity or role take a
// UserSession; nothing derives it from the current navigation path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Gallery,
    Collector,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Artist, Role::Gallery, Role::Collector, Role::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Artist => "artist",
            Role::Gallery => "gallery",
            Role::Collector => "collector",
            Role::Viewer => "viewer",
        }
    }

    /// "Artist", "Gallery", ...
    pub fn display_name(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role '{s}' (expected artist, gallery, collector or viewer)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// Viewers browse only; every other role may buy.
    pub fn can_purchase(&self) -> bool {
        self.role != Role::Viewer
    }

    pub fn navigation(&self) -> NavigationProfile {
        NavigationProfile::for_role(self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub path: String,
}

impl MenuItem {
    fn new(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
        }
    }
}

/// Dashboard navigation for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProfile {
    pub role: Role,
    pub dashboard_path: String,
    pub items: Vec<MenuItem>,
}

impl NavigationProfile {
    pub fn for_role(role: Role) -> Self {
        let dashboard_path = format!("/dashboard/{}", role.as_str());
        let mut items = vec![
            MenuItem::new("Dashboard", &dashboard_path),
            MenuItem::new("Settings", "/dashboard/settings"),
        ];

        let specific: &[(&str, &str)] = match role {
            Role::Artist => &[
                ("My Artworks", "/dashboard/artworks"),
                ("My Exhibitions", "/dashboard/exhibitions"),
                ("Sales", "/dashboard/sales"),
                ("Analytics", "/dashboard/analytics"),
            ],
            Role::Gallery => &[
                ("Artists", "/dashboard/gallery-artists"),
                ("Exhibitions", "/dashboard/exhibitions"),
                ("Artworks", "/dashboard/gallery-artworks"),
                ("Sales", "/dashboard/sales"),
            ],
            Role::Collector => &[
                ("My Collection", "/dashboard/collection"),
                ("Wishlists", "/dashboard/wishlists"),
                ("Transactions", "/dashboard/transactions"),
            ],
            Role::Viewer => &[
                ("Saved Artworks", "/dashboard/saved"),
                ("Follow", "/dashboard/following"),
                ("Events", "/dashboard/upcoming-events"),
            ],
        };
        items.extend(specific.iter().map(|(title, path)| MenuItem::new(title, path)));

        Self {
            role,
            dashboard_path,
            items,
        }
    }

    /// The dashboard entry matches only its exact path; other entries also
    /// match their sub-paths.
    pub fn active_item(&self, current_path: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| {
            if item.path == self.dashboard_path {
                current_path == item.path
            } else {
                current_path.starts_with(&item.path)
            }
        })
    }
}

// src/library/breadcrumbs.rs

use serde::Serialize;

pub const HOME_LABEL: &str = "home";
pub const ROOT_PATH: &str = "/";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    #[serde(rename = "name")]
    pub label: String,
    #[serde(rename = "path")]
    pub relative_path: String,
}

/// Splits an already validated path into its chain of ancestors, starting
/// with the `home` crumb for the media root.
pub fn build(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: HOME_LABEL.to_string(),
        relative_path: ROOT_PATH.to_string(),
    }];

    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: segment.to_string(),
            relative_path: current.clone(),
        });
    }

    crumbs
}

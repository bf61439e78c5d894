use serde::{Deserialize, Serialize};

/// One catalog row. JSON keys mirror the source table's Polish column
/// labels so the output matches the article verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigurineRecord {
    #[serde(rename = "Współrzędne")]
    pub coordinates: String,
    #[serde(rename = "Imię")]
    pub name: String,
    #[serde(rename = "Adres")]
    pub address: String,
    #[serde(rename = "Autor")]
    pub author: String,
    #[serde(rename = "Lokalizacja")]
    pub location: String,
    /// Deduplicated, lexicographically sorted image URLs.
    #[serde(rename = "Zdjęcie")]
    pub images: Vec<String>,
    /// Present only when status classification is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Row classification derived from image presence and cell coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Normal,
    Missing,
    NotInWroclaw,
    NoImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polish_keys_in_output() {
        let record = FigurineRecord {
            coordinates: "51.11, 17.03".into(),
            name: "Papa Krasnal".into(),
            address: "ul. Świdnicka".into(),
            author: "Tomasz Moczek".into(),
            location: "przy wejściu".into(),
            images: vec!["https://upload.wikimedia.org/x.jpg".into()],
            status: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        for key in ["Współrzędne", "Imię", "Adres", "Autor", "Lokalizacja", "Zdjęcie"] {
            assert!(json.contains(key), "missing key {} in {}", key, json);
        }
        assert!(!json.contains("status"));
        // Non-ASCII stays unescaped
        assert!(json.contains("Świdnicka"));
    }

    #[test]
    fn status_snake_case() {
        assert_eq!(serde_json::to_string(&Status::NoImage).unwrap(), "\"no_image\"");
        assert_eq!(
            serde_json::to_string(&Status::NotInWroclaw).unwrap(),
            "\"not_in_wroclaw\""
        );
        assert_eq!(serde_json::to_string(&Status::Missing).unwrap(), "\"missing\"");
        assert_eq!(serde_json::to_string(&Status::Normal).unwrap(), "\"normal\"");
    }
}

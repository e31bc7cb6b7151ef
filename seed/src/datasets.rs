//! Dataset readers. Two tabular files plus one line-delimited JSON file,
//! deserialized into plain records before any store is touched.

use std::{fs::read_to_string, io::Read, path::Path};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CityRecord {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub population: i32,
    #[serde(default)]
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRecord {
    pub city_id: i32,
    pub category: String,
    #[serde(default)]
    pub label: String,
    pub score: f64,
}

impl ScoreRecord {
    /// Criterion name used in the graph: the display label when present,
    /// otherwise the category code.
    pub fn criterion(&self) -> &str {
        if self.label.is_empty() {
            &self.category
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRecord {
    pub city_id: i32,
    #[serde(default)]
    pub author: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub fn read_cities(path: &Path) -> Vec<CityRecord> {
    let file = std::fs::File::open(path).expect("cities.csv missing!");
    parse_cities(file)
}

pub fn read_scores(path: &Path) -> Vec<ScoreRecord> {
    let file = std::fs::File::open(path).expect("scores.csv missing!");
    parse_scores(file)
}

pub fn read_reviews(path: &Path) -> Vec<ReviewRecord> {
    let contents = read_to_string(path).expect("reviews.jsonl missing!");
    parse_reviews(&contents)
}

fn parse_cities<R: Read>(input: R) -> Vec<CityRecord> {
    csv::Reader::from_reader(input)
        .deserialize()
        .map(|record| record.expect("Malformed city row"))
        .collect()
}

fn parse_scores<R: Read>(input: R) -> Vec<ScoreRecord> {
    csv::Reader::from_reader(input)
        .deserialize()
        .map(|record| record.expect("Malformed score row"))
        .collect()
}

fn parse_reviews(contents: &str) -> Vec<ReviewRecord> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).expect("Malformed review line"))
        .collect()
}

//! GeoJSON Module
//! Parses department boundary feature collections and answers hover hit tests.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A ring of `[lon, lat]` vertices.
pub type Ring = Vec<[f64; 2]>;

/// Boundary geometry of a department.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Outer ring followed by holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Iterate over each polygon (outer ring + holes).
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon(rings) => vec![rings.as_slice()],
            Geometry::MultiPolygon(polys) => polys.iter().map(|p| p.as_slice()).collect(),
        }
    }

    /// Outer rings only, as drawn on the map.
    pub fn outer_rings(&self) -> Vec<&Ring> {
        self.polygons()
            .into_iter()
            .filter_map(|rings| rings.first())
            .collect()
    }

    /// `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut bounds: Option<[f64; 4]> = None;
        for ring in self.outer_rings() {
            for &[x, y] in ring {
                let b = bounds.get_or_insert([x, y, x, y]);
                b[0] = b[0].min(x);
                b[1] = b[1].min(y);
                b[2] = b[2].max(x);
                b[3] = b[3].max(y);
            }
        }
        bounds
    }

    /// Even-odd containment test; points inside a hole are outside.
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.polygons().into_iter().any(|rings| {
            let mut inside = false;
            for ring in rings {
                if ring_contains(ring, point) {
                    inside = !inside;
                }
            }
            inside
        })
    }
}

fn ring_contains(ring: &[[f64; 2]], [px, py]: [f64; 2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A feature as read from the file, before required properties are checked.
#[derive(Debug, Clone)]
pub struct RawFeature {
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry>,
}

impl RawFeature {
    /// String value of a property; numeric codes are rendered as text.
    pub fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<GeometryDoc>,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeometryDoc {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

fn to_ring(positions: Vec<Vec<f64>>) -> Ring {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

impl From<GeometryDoc> for Geometry {
    fn from(doc: GeometryDoc) -> Self {
        match doc {
            GeometryDoc::Polygon(rings) => {
                Geometry::Polygon(rings.into_iter().map(to_ring).collect())
            }
            GeometryDoc::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .into_iter()
                    .map(|rings| rings.into_iter().map(to_ring).collect())
                    .collect(),
            ),
        }
    }
}

/// Parse a GeoJSON `FeatureCollection`.
pub fn parse_feature_collection(text: &str) -> Result<Vec<RawFeature>, serde_json::Error> {
    let doc: FeatureCollectionDoc = serde_json::from_str(text)?;
    Ok(doc
        .features
        .into_iter()
        .map(|f| RawFeature {
            properties: f.properties.unwrap_or_default(),
            geometry: f.geometry.map(Geometry::from),
        })
        .collect())
}

//! Chart Specification Module
//! Declarative (Vega-Lite) descriptions of the three charts: inline tidy data
//! plus field encodings.

use crate::charts::tidy::{DepartmentMapRow, GenderShareRow, TopNameRow};
use crate::data::Geometry;
use crate::stats::DepartmentFilter;
use serde_json::{json, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub struct ChartSpecs;

impl ChartSpecs {
    /// Horizontal bar chart of the yearly top names.
    ///
    /// `rows` holds the ranking of every year; a bound slider selects the year.
    pub fn top_names(rows: &[TopNameRow], year_range: (i32, i32), year: i32) -> Value {
        let (min, max) = year_range;
        let base = json!({
            "x": {"field": "births", "type": "quantitative", "title": "Number of Births", "scale": {"nice": true}},
            "y": {"field": "name", "type": "nominal", "title": "Name", "sort": {"field": "births", "order": "descending"}},
        });

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": {"text": "Top 15 Baby Names", "subtitle": "Use the slider to explore different years", "anchor": "start"},
            "data": {"values": rows},
            "params": [{
                "name": "select_year",
                "value": year,
                "bind": {"input": "range", "min": min, "max": max, "step": 1, "name": "Year: "}
            }],
            "transform": [{"filter": "datum.year == select_year"}],
            "layer": [
                {
                    "mark": {"type": "bar", "color": "steelblue", "stroke": "white", "strokeWidth": 1},
                    "encoding": {
                        "x": base["x"],
                        "y": base["y"],
                        "tooltip": [
                            {"field": "name", "type": "nominal"},
                            {"field": "births", "type": "quantitative"},
                            {"field": "year", "type": "ordinal"}
                        ]
                    }
                },
                {
                    "mark": {"type": "text", "align": "left", "baseline": "middle", "dx": 3, "fontSize": 10, "color": "black"},
                    "encoding": {
                        "x": base["x"],
                        "y": base["y"],
                        "text": {"field": "births", "type": "quantitative", "format": ".0f"}
                    }
                }
            ]
        })
    }

    /// Choropleth of the most given name per department.
    pub fn department_map(rows: &[DepartmentMapRow]) -> Value {
        let features: Vec<Value> = rows
            .iter()
            .map(|row| {
                json!({
                    "type": "Feature",
                    "geometry": Self::geometry_json(row),
                    "properties": {
                        "code": row.code,
                        "nom": row.department,
                        "max_name": row.max_name,
                        "max_count": row.max_count,
                        "min_name": row.min_name,
                        "min_count": row.min_count,
                    }
                })
            })
            .collect();

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": "Most Popular Name by Department (All Years)",
            "data": {"values": {"type": "FeatureCollection", "features": features}, "format": {"type": "json", "property": "features"}},
            "mark": {"type": "geoshape", "stroke": "white"},
            "encoding": {
                "color": {
                    "field": "properties.max_count",
                    "type": "quantitative",
                    "legend": {"title": "Total births of most popular name"}
                },
                "tooltip": [
                    {"field": "properties.nom", "type": "nominal", "title": "Department"},
                    {"field": "properties.max_name", "type": "nominal", "title": "Most given"},
                    {"field": "properties.max_count", "type": "quantitative", "title": "Births"},
                    {"field": "properties.min_name", "type": "nominal", "title": "Least given"},
                    {"field": "properties.min_count", "type": "quantitative", "title": "Births"}
                ]
            }
        })
    }

    /// Line chart of the boys/girls share of a name.
    pub fn gender_shares(rows: &[GenderShareRow], title: &str) -> Value {
        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": title,
            "data": {"values": rows},
            "mark": {"type": "line", "point": true},
            "params": [{"name": "grid", "select": "interval", "bind": "scales"}],
            "encoding": {
                "x": {"field": "year", "type": "ordinal", "title": "Year"},
                "y": {"field": "percentage", "type": "quantitative", "title": "Percentage (%)", "scale": {"domain": [0, 100]}},
                "color": {"field": "sex", "type": "nominal"},
                "tooltip": [
                    {"field": "year", "type": "ordinal"},
                    {"field": "sex", "type": "nominal"},
                    {"field": "percentage", "type": "quantitative"}
                ]
            }
        })
    }

    fn geometry_json(row: &DepartmentMapRow) -> Value {
        match &row.boundary.geometry {
            Some(Geometry::Polygon(rings)) => json!({"type": "Polygon", "coordinates": rings}),
            Some(Geometry::MultiPolygon(polys)) => {
                json!({"type": "MultiPolygon", "coordinates": polys})
            }
            None => Value::Null,
        }
    }
}

/// Title of the gender chart, e.g. "... Named Camille Over Time in France".
pub fn gender_title(name: &str, department: &DepartmentFilter) -> String {
    let place = match department {
        DepartmentFilter::All => "France".to_string(),
        DepartmentFilter::Named(department_name) => department_name.clone(),
    };
    format!(
        "Percentage of Boys and Girls Named {} Over Time in {}",
        title_case(name),
        place
    )
}

/// Capitalize each word, lower-casing the rest ("JEAN-PIERRE" -> "Jean-Pierre").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start_of_word = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(title_case("JEAN-PIERRE"), "Jean-Pierre");
        assert_eq!(title_case("ÉLODIE"), "Élodie");
        assert_eq!(
            gender_title("CAMILLE", &DepartmentFilter::All),
            "Percentage of Boys and Girls Named Camille Over Time in France"
        );
        assert_eq!(
            gender_title("CAMILLE", &DepartmentFilter::Named("Ain".into())),
            "Percentage of Boys and Girls Named Camille Over Time in Ain"
        );
    }

    #[test]
    fn test_top_names_spec_binds_year_slider() {
        let rows = vec![TopNameRow {
            year: 2000,
            rank: 1,
            name: "ALICE".into(),
            births: 80,
        }];
        let spec = ChartSpecs::top_names(&rows, (1900, 2020), 2000);
        assert_eq!(spec["params"][0]["bind"]["min"], 1900);
        assert_eq!(spec["params"][0]["bind"]["max"], 2020);
        assert_eq!(spec["data"]["values"][0]["births"], 80);
        assert_eq!(spec["layer"][0]["encoding"]["x"]["field"], "births");
    }

    #[test]
    fn test_gender_spec_carries_rows() {
        let rows = vec![
            GenderShareRow { year: 1980, sex: "Boys", percentage: 20.0 },
            GenderShareRow { year: 1980, sex: "Girls", percentage: 80.0 },
        ];
        let spec = ChartSpecs::gender_shares(&rows, "t");
        assert_eq!(spec["data"]["values"].as_array().map(|v| v.len()), Some(2));
        assert_eq!(spec["encoding"]["y"]["scale"]["domain"][1], 100);
    }
}

//! Input Form Description
//!
//! The sidebar of the dashboard: one widget per feature, with the same
//! bounds the validator enforces.

use crate::validator::{DayInput, RawFeatures, ValidationConfig};
use feature_engine::DayOfWeek;
use serde::Serialize;

/// Kind of input widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Slider,
    Select,
    NumberInput,
}

/// A single input widget
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSpec {
    /// Field name in `RawFeatures`
    pub field: &'static str,
    /// Label shown to the user
    pub label: &'static str,
    pub kind: WidgetKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Initial value (the option index for selects)
    pub default: f64,
    /// Options for select widgets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

/// Complete input form
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub widgets: Vec<WidgetSpec>,
}

impl FormSchema {
    /// Build the form from the validation ranges
    pub fn from_config(config: &ValidationConfig) -> Self {
        let number = |field, label, range: (f64, f64), default| WidgetSpec {
            field,
            label,
            kind: WidgetKind::NumberInput,
            min: range.0,
            max: range.1,
            step: 1.0,
            default,
            options: None,
        };

        Self {
            title: "Parámetros de Entrada",
            submit_label: "Predecir Severidad",
            widgets: vec![
                WidgetSpec {
                    field: "hour",
                    label: "Hora del Día",
                    kind: WidgetKind::Slider,
                    min: config.hour_range.0,
                    max: config.hour_range.1,
                    step: 1.0,
                    default: 12.0,
                    options: None,
                },
                WidgetSpec {
                    field: "day_of_week",
                    label: "Día de la Semana",
                    kind: WidgetKind::Select,
                    min: 0.0,
                    max: (DayOfWeek::ALL.len() - 1) as f64,
                    step: 1.0,
                    default: 0.0,
                    options: Some(DayOfWeek::NAMES.to_vec()),
                },
                number("temperature_f", "Temperatura (°F)", config.temperature_range, 70.0),
                number("humidity_pct", "Humedad (%)", config.humidity_range, 50.0),
                number("visibility_mi", "Visibilidad (millas)", config.visibility_range, 10.0),
                number("wind_speed_mph", "Velocidad del Viento (mph)", config.wind_speed_range, 5.0),
            ],
        }
    }

    /// Input pre-filled with every widget's default
    pub fn defaults(&self) -> RawFeatures {
        let value = |field: &str| {
            self.widgets
                .iter()
                .find(|w| w.field == field)
                .map(|w| w.default)
        };

        RawFeatures {
            hour: value("hour"),
            day_of_week: value("day_of_week")
                .and_then(|i| DayOfWeek::from_index(i as u8))
                .map(DayInput::from),
            temperature_f: value("temperature_f"),
            humidity_pct: value("humidity_pct"),
            visibility_mi: value("visibility_mi"),
            wind_speed_mph: value("wind_speed_mph"),
        }
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Validator;

    #[test]
    fn test_one_widget_per_feature() {
        let form = FormSchema::default();
        let fields: Vec<_> = form.widgets.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            ["hour", "day_of_week", "temperature_f", "humidity_pct", "visibility_mi", "wind_speed_mph"]
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let form = FormSchema::default();
        let features = Validator::default().validate(&form.defaults()).unwrap();
        assert_eq!(features.as_row(), [12.0, 0.0, 70.0, 50.0, 10.0, 5.0]);
    }

    #[test]
    fn test_day_select_lists_names() {
        let form = FormSchema::default();
        let day = &form.widgets[1];
        assert_eq!(day.kind, WidgetKind::Select);
        assert_eq!(day.options.as_ref().map(Vec::len), Some(7));
        assert_eq!(day.options.as_ref().unwrap()[2], "Miércoles");
    }

    #[test]
    fn test_serialized_kind() {
        let json = serde_json::to_value(FormSchema::default()).unwrap();
        assert_eq!(json["widgets"][0]["kind"], "slider");
        assert_eq!(json["widgets"][2]["kind"], "number_input");
        assert!(json["widgets"][2].get("options").is_none());
    }
}

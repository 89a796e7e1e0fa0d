use chrono::NaiveDate;
use leme_core::commands::pre_opening::{self, PreOpeningOptions};
use serde_json::json;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap_or_default()
}

#[test]
fn pre_opening_returns_assessment_envelope() {
    let answers = json!({
        "business_type": "product",
        "has_inventory": true,
        "sector": "retail",
        "state": "MG",
        "city": "Belo Horizonte",
        "opening_month": 11,
        "opening_year": 2026,
        "available_capital": 40000,
        "expected_revenue": 15000,
        "owner_draw": "no",
        "has_employees": true,
        "employee_band": "1-2",
        "guaranteed_clients": "no"
    });

    let result = pre_opening::run_with_options(PreOpeningOptions {
        path: None,
        as_of: as_of(),
        stdin_override: Some(answers.to_string()),
    });
    assert!(result.is_ok());
    if let Ok(envelope) = result {
        assert_eq!(envelope.command, "pre-opening");
        assert_eq!(envelope.data["as_of"], "2026-10-01");
        let assessment = &envelope.data["assessment"];
        assert_eq!(assessment["months_until_opening"], 1);
        // (25000 + 1.5 x 8000) x 1.2 x 1.15
        assert_eq!(assessment["capital"]["recommended"], 51060.0);
        assert_eq!(assessment["capital"]["status"], "below");
        assert_eq!(assessment["alerts"][0]["id"], "capital_below_reference");
        assert_eq!(assessment["alerts"][1]["id"], "employees_raise_initial_risk");
        assert!(
            assessment["alerts"]
                .as_array()
                .is_some_and(|alerts| alerts.len() == 3)
        );
        assert_eq!(
            assessment["checklist_30_days"].as_array().map(Vec::len),
            Some(7)
        );
    }
}

#[test]
fn unknown_enum_value_is_invalid_argument() {
    let result = pre_opening::run_with_options(PreOpeningOptions {
        path: None,
        as_of: as_of(),
        stdin_override: Some(json!({"business_type": "franchise"}).to_string()),
    });
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
    }
}

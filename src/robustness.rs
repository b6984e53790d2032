use serde_json::Value;

pub const ROBUSTNESS_MAX: f64 = 10.0;
pub const POLICY_FLAG_BONUS: f64 = 2.5;

/// Canonical policy flags and the report wording that should resolve to them.
///
/// Resolving the wording is the extractor's job; scoring only looks at whether
/// the canonical flag ended up `true`.
pub const POLICY_SYNONYMS: [(&str, &[&str]); 4] = [
    (
        "whistleblowing",
        &["speak-up", "speak up", "ethics hotline", "reporting concerns"],
    ),
    (
        "anti_corruption",
        &["anti-bribery", "integrity", "ethical conduct"],
    ),
    (
        "human_rights",
        &["labour rights", "worker rights", "social responsibility"],
    ),
    (
        "dei_policy",
        &["diversity", "inclusion", "equality", "diverse workforce"],
    ),
];

pub fn synonyms_for(flag: &str) -> Option<&'static [&'static str]> {
    POLICY_SYNONYMS
        .iter()
        .find(|(canonical, _)| *canonical == flag)
        .map(|(_, synonyms)| *synonyms)
}

/// Canonical flags set to `true` under the candidate's `policies` section.
pub fn resolved_policy_flags(candidate: &Value) -> Vec<&'static str> {
    let Some(policies) = candidate.get("policies").and_then(Value::as_object) else {
        return Vec::new();
    };

    POLICY_SYNONYMS
        .iter()
        .filter(|(canonical, _)| policies.get(*canonical) == Some(&Value::Bool(true)))
        .map(|(canonical, _)| *canonical)
        .collect()
}

/// [`POLICY_FLAG_BONUS`] per resolved canonical flag, capped at
/// [`ROBUSTNESS_MAX`].
pub fn robustness_score(candidate: &Value) -> f64 {
    let resolved = resolved_policy_flags(candidate).len();
    (resolved as f64 * POLICY_FLAG_BONUS).min(ROBUSTNESS_MAX)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn each_true_flag_earns_a_bonus() {
        let candidate = json!({"policies": {"whistleblowing": true, "anti_corruption": true}});
        assert_eq!(robustness_score(&candidate), 5.0);
        assert_eq!(
            resolved_policy_flags(&candidate),
            vec!["whistleblowing", "anti_corruption"]
        );
    }

    #[test]
    fn all_flags_reach_the_cap_exactly() {
        let candidate = json!({"policies": {
            "whistleblowing": true,
            "anti_corruption": true,
            "human_rights": true,
            "dei_policy": true,
            "climate_policy": true
        }});
        assert_eq!(robustness_score(&candidate), ROBUSTNESS_MAX);
    }

    #[test]
    fn false_null_and_unmapped_flags_earn_nothing() {
        let candidate = json!({"policies": {
            "whistleblowing": false,
            "anti_corruption": null,
            "human_rights": "true",
            "climate_policy": true
        }});
        assert_eq!(robustness_score(&candidate), 0.0);
    }

    #[test]
    fn missing_policy_section_scores_zero() {
        assert_eq!(robustness_score(&json!({})), 0.0);
        assert_eq!(robustness_score(&json!({"policies": null})), 0.0);
        assert_eq!(robustness_score(&json!({"policies": {}})), 0.0);
        assert_eq!(robustness_score(&json!({"policies": [true]})), 0.0);
        assert_eq!(robustness_score(&json!("policies")), 0.0);
    }

    #[test]
    fn synonyms_are_listed_per_canonical_flag() {
        assert_eq!(
            synonyms_for("whistleblowing").map(|terms| terms.contains(&"speak-up")),
            Some(true)
        );
        assert!(synonyms_for("climate_policy").is_none());
    }
}

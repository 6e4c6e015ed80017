use std::fmt;

use iap_core::Act;
use iap_core::target::RoleBasis;

use crate::Evaluation;

const RULE_WIDTH: usize = 60;

/// Human-readable rendering of an [Evaluation].
pub struct Report<'a> {
    evaluation: &'a Evaluation,
}

impl<'a> Report<'a> {
    pub fn new(evaluation: &'a Evaluation) -> Self {
        Report { evaluation }
    }
}

struct ActLine<'a>(&'a Act);

impl fmt::Display for ActLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let act = self.0;
        write!(
            f,
            "{} | {} [{}] | intensity={:.2} | {}",
            act.act_type, act.target_entity, act.target_role, act.intensity, act.force
        )
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let evaluation = self.evaluation;
        let result = &evaluation.result;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "IAP (Illocutionary Act Preservation) Evaluation")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        for (heading, text, set) in [
            ("Original", &evaluation.original_text, &evaluation.original),
            ("Translated", &evaluation.translated_text, &evaluation.translated),
        ] {
            writeln!(f, "【{heading}】")?;
            writeln!(f, "  Text: {text}")?;
            writeln!(f, "  Primary Act: {}", set.primary_act)?;
            writeln!(f, "  Address Mode: {}", set.address_mode)?;
            writeln!(f, "  Overall Force: {}", set.overall_force)?;
            writeln!(f)?;
        }

        writeln!(f, "【IAP Score】")?;
        writeln!(f, "  ★ Overall: {:.2}", result.overall)?;
        writeln!(f, "  ├─ IAP-Set (Type Preservation): {:.2}", result.set_rate)?;
        writeln!(f, "  ├─ IAP-Force (Force Preservation): {:.2}", result.force_rate)?;
        writeln!(
            f,
            "  ├─ IAP-Target (Target Preservation, weighted): {:.2}",
            result.target_rate
        )?;
        writeln!(f, "  ├─ Intensity Match: {:.2}", result.intensity_match)?;
        writeln!(f, "  ├─ No Critical Loss: {}", result.no_critical_loss)?;
        if result.address_mode_match() {
            writeln!(
                f,
                "  ├─ Address Mode: {} → {} ✓",
                result.address_mode_original, result.address_mode_translated
            )?;
        } else {
            writeln!(
                f,
                "  ├─ Address Mode: {} → {} ⚠️ MISMATCH",
                result.address_mode_original, result.address_mode_translated
            )?;
            writeln!(f, "  │    └─ Penalty: -{:.2}", result.address_mode_penalty)?;
        }
        if result.critical_loss_penalty > 0.0 {
            writeln!(
                f,
                "  └─ ⚠️ Critical Act Penalty: -{:.2}",
                result.critical_loss_penalty
            )?;
        }
        writeln!(f)?;

        writeln!(f, "【Preserved Acts】({})", result.matched.len())?;
        for pair in &result.matched {
            let weight = pair.original.act_type.target_weight();
            if weight > 1.0 {
                writeln!(f, "  ✓ {} [weight={weight:.1}]", ActLine(&pair.original))?;
            } else {
                writeln!(f, "  ✓ {}", ActLine(&pair.original))?;
            }
            writeln!(f, "    → {}", ActLine(&pair.translated))?;

            let role = pair.target.role;
            let role_detail = match role.basis {
                RoleBasis::Compatible(act_type) => format!(
                    "role={:.2} ✨{}~{} (compatible for {act_type})",
                    role.score, pair.original.target_role, pair.translated.target_role
                ),
                RoleBasis::Exact | RoleBasis::Default => format!("role={:.2}", role.score),
            };
            writeln!(
                f,
                "       (type={:.2}, target={:.2} [{role_detail}, entity={:.2}])",
                pair.type_similarity, pair.target.score, pair.target.entity
            )?;
        }
        writeln!(f)?;

        if !result.lost.is_empty() {
            writeln!(f, "【Lost Acts】({})", result.lost.len())?;
            for lost in result.lost_acts() {
                let marker = if lost.critical { " ⚠️ CRITICAL" } else { "" };
                writeln!(
                    f,
                    "  ✗ {} (severity: {}, weight: {:.1}){marker}",
                    ActLine(lost.act),
                    lost.severity,
                    lost.force_weight
                )?;
            }
            writeln!(f)?;
        }

        if !result.added.is_empty() {
            writeln!(f, "【Added Acts】({})", result.added.len())?;
            for act in &result.added {
                writeln!(f, "  + {}", ActLine(act))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use iap_core::RawActSet;

    use super::*;

    fn raw(json: &str) -> RawActSet {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn it_renders_scores_and_lost_acts() {
        let original = raw(
            r#"{"primary_act": "CLOSE_ESCAPE", "overall_force": "cornering",
                "acts": [
                  {"type": "CLOSE_ESCAPE", "target_role": "LISTENER", "intensity": 0.9, "force": "no way out"},
                  {"type": "EXPRESS", "target_role": "SELF", "intensity": 0.4}
                ]}"#,
        );
        let translated = raw(
            r#"{"primary_act": "EXPRESS", "address_mode": "reported",
                "acts": [{"type": "EXPRESS", "target_role": "SELF", "intensity": 0.4}]}"#,
        );
        let evaluation =
            Evaluation::from_raw("逃げるな", original, "He felt sad.", translated).unwrap();
        let report = Report::new(&evaluation).to_string();

        assert!(report.starts_with(&"=".repeat(60)));
        assert!(report.contains("  Text: 逃げるな\n"));
        assert!(report.contains("  Primary Act: CLOSE_ESCAPE\n"));
        assert!(report.contains("  ├─ IAP-Set (Type Preservation): 0.50\n"));
        assert!(report.contains("  ├─ No Critical Loss: false\n"));
        assert!(report.contains("  ├─ Address Mode: direct → reported ⚠️ MISMATCH\n"));
        assert!(report.contains("  │    └─ Penalty: -0.35\n"));
        assert!(report.contains("  └─ ⚠️ Critical Act Penalty: -0.20\n"));
        assert!(report.contains("【Preserved Acts】(1)\n"));
        assert!(report.contains("【Lost Acts】(1)\n"));
        assert!(report.contains(
            "  ✗ CLOSE_ESCAPE |  [LISTENER] | intensity=0.90 | no way out (severity: high, weight: "
        ));
        assert!(report.contains(" ⚠️ CRITICAL\n"));
        assert!(!report.contains("【Added Acts】"));
    }

    #[test]
    fn it_marks_compatibility_rescues() {
        let original = raw(
            r#"{"primary_act": "ULTIMATUM",
                "acts": [{"type": "ULTIMATUM", "target_role": "LISTENER", "intensity": 0.5}]}"#,
        );
        let translated = raw(
            r#"{"primary_act": "ULTIMATUM",
                "acts": [{"type": "ULTIMATUM", "target_role": "SITUATION", "intensity": 0.5}]}"#,
        );
        let evaluation = Evaluation::from_raw("", original, "", translated).unwrap();
        let report = Report::new(&evaluation).to_string();

        assert!(report.contains("  ├─ Address Mode: direct → direct ✓\n"));
        assert!(report.contains("role=0.85 ✨LISTENER~SITUATION (compatible for ULTIMATUM)"));
        assert!(!report.contains("【Lost Acts】"));
    }
}

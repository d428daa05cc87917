//! Ruleset selection from the command line.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use snake_arcade_core::Ruleset;
use toml::{Table, Value};

/// Built-in rule presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Variant {
    /// Cookies and bananas, 2×2 rocks, ten second star, F11 fullscreen.
    Deluxe,
    /// Cookies only, single-cell rocks, five second star.
    Classic,
}

impl Variant {
    fn ruleset(self) -> Ruleset {
        match self {
            Self::Deluxe => Ruleset::deluxe(),
            Self::Classic => Ruleset::classic(),
        }
    }
}

/// Resolves the ruleset for this run. A rules file overrides fields of the
/// chosen preset; everything it omits keeps the preset's value.
pub(crate) fn load(variant: Variant, rules_file: Option<&Path>) -> Result<Ruleset> {
    let preset = variant.ruleset();
    let rules = match rules_file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file {}", path.display()))?;
            parse(preset, &contents)
                .with_context(|| format!("invalid rules file {}", path.display()))?
        }
        None => preset,
    };
    rules.validate().context("ruleset rejected")?;
    Ok(rules)
}

fn parse(preset: Ruleset, contents: &str) -> Result<Ruleset> {
    let overrides: Table = contents.parse().context("failed to parse rules toml")?;
    let mut merged = Value::try_from(preset).context("failed to encode preset rules")?;
    if let Value::Table(table) = &mut merged {
        overlay(table, overrides);
    }
    merged.try_into().context("rules do not describe a ruleset")
}

/// Writes `overrides` into `base`, merging nested tables key by key.
fn overlay(base: &mut Table, overrides: Table) {
    for (key, value) in overrides {
        match value {
            Value::Table(nested) => {
                if let Some(Value::Table(existing)) = base.get_mut(&key) {
                    overlay(existing, nested);
                    continue;
                }
                let _ = base.insert(key, Value::Table(nested));
            }
            value => {
                let _ = base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{CellRectSize, GridSize, ItemKind};

    #[test]
    fn presets_load_without_a_file() {
        let classic = load(Variant::Classic, None).expect("classic rules");
        assert_eq!(classic, Ruleset::classic());
        let deluxe = load(Variant::Deluxe, None).expect("deluxe rules");
        assert_eq!(deluxe, Ruleset::deluxe());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let rules = parse(
            Ruleset::deluxe(),
            r#"
            initial_length = 6
            star_chance = 0.5

            [grid]
            columns = 30
            rows = 24
        "#,
        )
        .expect("rules should parse");
        assert_eq!(rules.initial_length, 6);
        assert_eq!(rules.grid, GridSize::new(30, 24));
        assert_eq!(rules.apple_score, Ruleset::deluxe().apple_score);
    }

    #[test]
    fn file_overrides_keep_the_chosen_preset() {
        let rules = parse(
            Ruleset::classic(),
            r#"
            initial_length = 6

            [grid]
            columns = 30
        "#,
        )
        .expect("rules should parse");
        assert_eq!(rules.initial_length, 6);
        assert_eq!(rules.grid, GridSize::new(30, 20));
        assert_eq!(rules.rock_size(), CellRectSize::square(1));
        assert_eq!(rules.event_items, vec![ItemKind::Cookie]);
        assert_eq!(rules.bombs_per_event, 2);
        assert_eq!(rules.star_duration_ms, 5_000);
        assert!(!rules.fullscreen_toggle);
    }

    #[test]
    fn empty_file_yields_the_preset() {
        let rules = parse(Ruleset::classic(), "").expect("empty rules parse");
        assert_eq!(rules, Ruleset::classic());
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(parse(Ruleset::deluxe(), "initial_length = \"long\"").is_err());
        assert!(parse(Ruleset::deluxe(), "initial_length = ").is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = load(Variant::Deluxe, Some(Path::new("no/such/rules.toml")))
            .expect_err("file does not exist");
        assert!(format!("{error:#}").contains("no/such/rules.toml"));
    }
}

//! Decoding of single-line presets.
//!
//! A preset is a `;` separated list of `key=value` entries:
//!
//! ```text
//! n=5; axiom=F; angle=25.7; length=2.0; rules={F: F[+F]F[-F]F};
//! variables={F}; constants={+, -, [, ]}; actions={F: DLi, +: RC, -: RA, [: Push, ]: Pop}
//! ```
//!
//! All whitespace inside keys and values is ignored. Unknown keys and
//! entries without exactly one `=` are skipped. In `actions`, a list item
//! without `:` adds another action to the previous symbol, so
//! `{X: Push, RC, ]: Pop}` maps `X` to `[PushState, RotateClockwise]`.
//! Unknown action tags are dropped.

use crate::alphabet::{Action, Configuration};
use crate::error::PresetError;
use glam::Vec2;
use std::str::FromStr;

impl FromStr for Configuration {
    type Err = PresetError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut config = Configuration::default();

        for entry in line.split(';') {
            let parts: Vec<&str> = entry.split('=').collect();
            let [key, value] = parts.as_slice() else {
                continue;
            };
            let key = strip_whitespace(key);
            let value = strip_whitespace(value);

            match key.as_str() {
                "n" => config.generation = parse_number(&key, &value)?,
                "angle" => config.angle = parse_number(&key, &value)?,
                "length" => config.length = parse_number(&key, &value)?,
                "axiom" => config.axiom = value,
                "variables" => config.variables.extend(symbols(&value)),
                "constants" => config.constants.extend(symbols(&value)),
                "rules" => {
                    for item in list_items(&value) {
                        let (variable, body) =
                            split_pair(item).ok_or_else(|| malformed("rules", item))?;
                        config.rules.insert(variable, body);
                    }
                }
                "actions" => {
                    let mut last = None;
                    for item in list_items(&value) {
                        let (symbol, tag) = match item.split_once(':') {
                            Some(_) => split_pair(item).ok_or_else(|| malformed("actions", item))?,
                            None => (last.ok_or_else(|| malformed("actions", item))?, item),
                        };
                        if last != Some(symbol) {
                            config.actions.set(symbol, []);
                            last = Some(symbol);
                        }
                        if let Some(action) = Action::from_tag(tag) {
                            config.actions.push(symbol, action);
                        }
                    }
                }
                "offset" => config.offset = parse_offset(&value)?,
                other => log::debug!("skipping unknown preset key {other:?}"),
            }
        }

        Ok(config)
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn list_items(value: &str) -> impl Iterator<Item = &str> {
    value
        .trim_matches(|c| c == '{' || c == '}')
        .split(',')
        .filter(|item| !item.is_empty())
}

fn symbols(value: &str) -> impl Iterator<Item = char> + '_ {
    list_items(value).filter_map(|item| item.chars().next())
}

/// Splits `k:v` into its first key character and the value.
fn split_pair(item: &str) -> Option<(char, &str)> {
    let (key, value) = item.split_once(':')?;
    Some((key.chars().next()?, value))
}

fn malformed(key: &'static str, item: &str) -> PresetError {
    PresetError::MalformedPair {
        key,
        item: item.to_owned(),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, PresetError> {
    value.parse().map_err(|_| PresetError::InvalidNumber {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn parse_offset(value: &str) -> Result<Vec2, PresetError> {
    let coords: Vec<&str> = list_items(value).collect();
    let [x, y] = coords.as_slice() else {
        return Err(PresetError::InvalidOffset(value.to_owned()));
    };
    match (x.parse(), y.parse()) {
        (Ok(x), Ok(y)) => Ok(Vec2::new(x, y)),
        _ => Err(PresetError::InvalidOffset(value.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANT: &str = "n=5; axiom = F; angle=25.7; length=2.0; rules={F: F[+F]F[-F]F}; \
        variables={F}; constants={+, -, [, ]}; \
        actions={F: DLi, +: RC, -: RA, [: Push, ]: Pop}; offset={0, -40.5}";

    #[test]
    fn test_parse_full_preset() {
        let config: Configuration = PLANT.parse().unwrap();

        assert_eq!(config.generation, 5);
        assert_eq!(config.axiom, "F");
        assert_eq!(config.angle, 25.7);
        assert_eq!(config.length, 2.0);
        assert_eq!(config.rules.get('F'), Some("F[+F]F[-F]F"));
        assert_eq!(config.variables.iter().collect::<String>(), "F");
        assert_eq!(config.constants.len(), 4);
        assert_eq!(config.actions.actions('F'), &[Action::DrawLine]);
        assert_eq!(config.actions.actions('-'), &[Action::RotateAnticlockwise]);
        assert_eq!(config.actions.actions(']'), &[Action::PopState]);
        assert_eq!(config.offset, Vec2::new(0.0, -40.5));
        assert!(config.diagnostics().is_empty());
    }

    #[test]
    fn test_continuation_items_extend_previous_symbol() {
        let config: Configuration = "actions={[: Push, RA, Bogus, ]: Pop, RC, X: Bogus}"
            .parse()
            .unwrap();
        assert_eq!(
            config.actions.actions('['),
            &[Action::PushState, Action::RotateAnticlockwise]
        );
        assert_eq!(
            config.actions.actions(']'),
            &[Action::PopState, Action::RotateClockwise]
        );
        // Present but empty when no tag is recognised.
        assert!(config.actions.contains('X'));
        assert!(config.actions.actions('X').is_empty());
    }

    #[test]
    fn test_long_action_names() {
        let config: Configuration = "actions={0: DrawLeaf, 1: DrawLine, NoOp}".parse().unwrap();
        assert_eq!(config.actions.actions('0'), &[Action::DrawLeaf]);
        assert_eq!(config.actions.actions('1'), &[Action::DrawLine, Action::NoOp]);
    }

    #[test]
    fn test_unknown_and_malformed_entries_are_skipped() {
        let config: Configuration = "colour=red; axiom=A=B; ;axiom=X Y".parse().unwrap();
        assert_eq!(config.axiom, "XY");
        assert_eq!(config.generation, 0);
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        assert_eq!(
            "n=-1".parse::<Configuration>(),
            Err(PresetError::InvalidNumber {
                key: "n".into(),
                value: "-1".into()
            })
        );
        assert!(matches!(
            "angle=wide".parse::<Configuration>(),
            Err(PresetError::InvalidNumber { .. })
        ));
        assert_eq!(
            "offset={1}".parse::<Configuration>(),
            Err(PresetError::InvalidOffset("{1}".into()))
        );
    }

    #[test]
    fn test_rule_without_colon_is_an_error() {
        assert_eq!(
            "rules={FF}".parse::<Configuration>(),
            Err(PresetError::MalformedPair {
                key: "rules",
                item: "FF".into()
            })
        );
    }
}

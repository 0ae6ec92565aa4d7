//! Command-line selection flags.

use chrono::NaiveDate;
use clap::Args;
use yard_core::Species;
use yard_data::Selection;

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SelectionArgs {
    /// Select every record (the default when no other filter is given)
    #[arg(long, conflicts_with_all = ["species", "piles", "indices", "from", "to"])]
    pub all: bool,

    /// Only records of this species
    #[arg(long)]
    pub species: Option<Species>,

    /// Only records of this pile (repeatable)
    #[arg(long = "pile")]
    pub piles: Vec<String>,

    /// Only the record at this store index, as shown by `list` (repeatable)
    #[arg(long = "index")]
    pub indices: Vec<usize>,

    /// Earliest survey date, inclusive
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Latest survey date, inclusive
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
}

impl SelectionArgs {
    /// Every given filter must match.
    pub fn to_selection(&self) -> Selection {
        if self.all {
            return Selection::All;
        }
        let mut parts = Vec::new();
        if let Some(species) = self.species {
            parts.push(Selection::Species(species));
        }
        if !self.piles.is_empty() {
            parts.push(Selection::Piles(self.piles.iter().cloned().collect()));
        }
        if !self.indices.is_empty() {
            parts.push(Selection::Indices(self.indices.iter().copied().collect()));
        }
        if self.from.is_some() || self.to.is_some() {
            parts.push(Selection::DateRange {
                from: self.from,
                to: self.to,
            });
        }
        match parts.len() {
            0 => Selection::All,
            1 => parts.swap_remove(0),
            _ => Selection::AllOf(parts),
        }
    }
}

pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    yard_utils::dates::parse_date(s).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::BTreeSet;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        selection: SelectionArgs,
    }

    fn parse(args: &[&str]) -> Selection {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().selection.to_selection()
    }

    #[test]
    fn test_defaults_to_all() {
        assert_eq!(parse(&[]), Selection::All);
        assert_eq!(parse(&["--all"]), Selection::All);
    }

    #[test]
    fn test_single_filter() {
        assert_eq!(
            parse(&["--species", "pinus"]),
            Selection::Species(Species::Pinus)
        );
        assert_eq!(
            parse(&["--index", "2", "--index", "0"]),
            Selection::Indices(BTreeSet::from([0, 2]))
        );
    }

    #[test]
    fn test_filters_combine() {
        let selection = parse(&["--pile", "P-01", "--from", "01/06/2024"]);
        assert_eq!(
            selection,
            Selection::AllOf(vec![
                Selection::Piles(BTreeSet::from(["P-01".to_string()])),
                Selection::DateRange {
                    from: NaiveDate::from_ymd_opt(2024, 6, 1),
                    to: None,
                },
            ])
        );
    }

    #[test]
    fn test_all_conflicts_with_filters() {
        assert!(TestCli::try_parse_from(["test", "--all", "--species", "Pinus"]).is_err());
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(TestCli::try_parse_from(["test", "--species", "Cedro"]).is_err());
        assert!(TestCli::try_parse_from(["test", "--from", "June"]).is_err());
    }
}

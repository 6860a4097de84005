//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sheet_merge::{Resolution, DEFAULT_OUT_DIR};

#[derive(Parser, Debug)]
#[command(name = "sxm")]
#[command(
    author,
    version,
    about = "Three-way merge of xlsx workbooks",
    long_about = "Merges the changes two edited copies (file1, file2) made to a common \
                  ancestor workbook (base). Only the ranges listed in the JSON \
                  configuration are compared. The result is written to the output \
                  directory under base's file name."
)]
pub struct Cli {
    /// Common ancestor workbook
    #[arg(short, long, value_name = "PATH")]
    pub base: Option<PathBuf>,

    /// First edited workbook
    #[arg(long, visible_alias = "f1", value_name = "PATH")]
    pub file1: Option<PathBuf>,

    /// Second edited workbook
    #[arg(long, visible_alias = "f2", value_name = "PATH")]
    pub file2: Option<PathBuf>,

    /// JSON configuration, either a file path or the JSON text itself
    #[arg(short, long, value_name = "PATH|JSON")]
    pub json: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// How to resolve cells both files changed
    #[arg(long, value_enum, default_value_t = OnConflict::Prompt)]
    pub on_conflict: OnConflict,

    /// Log each decision to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnConflict {
    /// Ask on the console for each conflict
    Prompt,
    /// Take file1's cell
    Side1,
    /// Take file2's cell
    Side2,
    /// Keep base's cell
    Base,
}

impl OnConflict {
    /// The resolution applied to every conflict, `None` when prompting
    pub fn fixed(self) -> Option<Resolution> {
        match self {
            OnConflict::Prompt => None,
            OnConflict::Side1 => Some(Resolution::Side1),
            OnConflict::Side2 => Some(Resolution::Side2),
            OnConflict::Base => Some(Resolution::KeepBase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_and_alias_flags() {
        let cli = Cli::try_parse_from([
            "sxm", "-b", "base.xlsx", "--f1", "a.xlsx", "--f2", "b.xlsx", "-j", "{}",
        ])
        .unwrap();

        assert_eq!(cli.base, Some(PathBuf::from("base.xlsx")));
        assert_eq!(cli.file1, Some(PathBuf::from("a.xlsx")));
        assert_eq!(cli.file2, Some(PathBuf::from("b.xlsx")));
        assert_eq!(cli.json.as_deref(), Some("{}"));
        assert_eq!(cli.out, PathBuf::from("out"));
        assert_eq!(cli.on_conflict, OnConflict::Prompt);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_on_conflict_values() {
        let cli = Cli::try_parse_from(["sxm", "--on-conflict", "side2", "-o", "merged", "-v"])
            .unwrap();
        assert_eq!(cli.on_conflict.fixed(), Some(Resolution::Side2));
        assert_eq!(cli.out, PathBuf::from("merged"));
        assert!(cli.verbose);

        assert!(Cli::try_parse_from(["sxm", "--on-conflict", "mine"]).is_err());
    }
}

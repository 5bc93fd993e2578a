use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use polychain::core::io::snapshot::Snapshot;
use polychain::core::models::system::System;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct StrandMatches {
    pub strand: String,
    /// Zero-based start of each match along the strand's natural order.
    pub starts: Vec<usize>,
}

pub fn run(args: SearchArgs) -> Result<()> {
    if args.pattern.is_empty() {
        return Err(CliError::Argument("search pattern must not be empty".to_string()));
    }
    info!("Searching {:?} for '{}'.", &args.snapshot, &args.pattern);

    let snapshot = Snapshot::load(&args.snapshot).map_err(|e| CliError::FileParsing {
        path: args.snapshot.clone(),
        source: e.into(),
    })?;
    let system = snapshot.into_system().map_err(|e| CliError::FileParsing {
        path: args.snapshot.clone(),
        source: e.into(),
    })?;

    let results = find_matches(&system, &args.pattern, args.strand.as_deref());
    let total: usize = results.iter().map(|r| r.starts.len()).sum();
    for result in results.iter().filter(|r| !r.starts.is_empty()) {
        let starts: Vec<String> = result.starts.iter().map(ToString::to_string).collect();
        println!(
            "{}: {} match(es) at {}",
            result.strand,
            result.starts.len(),
            starts.join(", ")
        );
    }
    if total == 0 {
        println!("No matches for '{}'.", args.pattern);
    }
    Ok(())
}

/// Matches per strand, strands unnamed in the snapshot shown as `#index`.
pub fn find_matches(system: &System, pattern: &str, label: Option<&str>) -> Vec<StrandMatches> {
    let mut results = Vec::new();
    for (index, (id, strand)) in system.strands_iter().enumerate() {
        if label.is_some() && strand.label.as_deref() != label {
            continue;
        }
        let Some(view) = system.strand_view(id) else {
            continue;
        };
        let monomers = view.monomers();
        let starts = view
            .search(pattern)
            .iter()
            .filter_map(|found| found.first())
            .filter_map(|first| monomers.iter().position(|m| m == first))
            .collect();
        results.push(StrandMatches {
            strand: strand.label.clone().unwrap_or_else(|| format!("#{index}")),
            starts,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use polychain::core::models::frame::OrientedFrame;
    use polychain::core::models::strand::{Direction, StrandKind};
    use polychain::core::notify::Notifier;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn system() -> System {
        let notifier = Notifier::new();
        let mut system = System::new();
        for (kind, label, sequence) in [
            (StrandKind::dna(), Some("left"), "GATCGATC"),
            (StrandKind::dna(), None, "AAGATT"),
            (StrandKind::Peptide, Some("tag"), "GATC"),
        ] {
            let strand = system.add_strand(kind, label.map(str::to_string));
            for symbol in sequence.chars() {
                system
                    .append(strand, kind.natural_direction(), symbol, OrientedFrame::default(), &notifier)
                    .unwrap();
            }
        }
        system
    }

    #[test]
    fn finds_starts_per_strand() {
        let results = find_matches(&system(), "GAT", None);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].strand, "left");
        assert_eq!(results[0].starts, vec![0, 4]);
        assert_eq!(results[1].strand, "#1");
        assert_eq!(results[1].starts, vec![2]);
        assert_eq!(results[2].starts, vec![0]);
    }

    #[test]
    fn label_filter_limits_the_search() {
        let results = find_matches(&system(), "GATC", Some("tag"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].strand, "tag");
    }

    #[test]
    fn run_reads_a_saved_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.toml");
        Snapshot::from_system(&system()).save(&path).unwrap();

        let args = SearchArgs {
            snapshot: path,
            pattern: "TCG".to_string(),
            strand: None,
        };
        assert!(run(args).is_ok());
    }

    #[test]
    fn run_rejects_empty_pattern_and_missing_file() {
        let args = SearchArgs {
            snapshot: PathBuf::from("unused.toml"),
            pattern: String::new(),
            strand: None,
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));

        let args = SearchArgs {
            snapshot: PathBuf::from("/nonexistent/model.toml"),
            pattern: "A".to_string(),
            strand: None,
        };
        assert!(matches!(run(args), Err(CliError::FileParsing { .. })));
    }
}

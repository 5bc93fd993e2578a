use crate::cli::BuildArgs;
use crate::config::{BuildPlan, PartialDesign, StrandPlan};
use crate::error::{CliError, Result};
use polychain::core::io::coordinates::CoordinateCsv;
use polychain::core::io::oxdna::{OxdnaConfiguration, OxdnaTopology};
use polychain::core::io::snapshot::Snapshot;
use polychain::core::io::traits::SystemWriter;
use polychain::core::models::system::System;
use polychain::core::notify::Notifier;
use polychain::engine::error::EngineError;
use polychain::workflows;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MIN_BOX_SIZE: f64 = 20.0;
const BOX_MARGIN: f64 = 10.0;

/// Paths written by one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutputs {
    pub topology: PathBuf,
    pub configuration: PathBuf,
    pub snapshot: PathBuf,
    pub csv: Option<PathBuf>,
}

impl BuildOutputs {
    fn from_prefix(prefix: &Path, csv: bool) -> Self {
        Self {
            topology: with_extension(prefix, "top"),
            configuration: with_extension(prefix, "dat"),
            snapshot: with_extension(prefix, "toml"),
            csv: csv.then(|| with_extension(prefix, "csv")),
        }
    }
}

fn with_extension(prefix: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

pub fn run(args: BuildArgs) -> Result<()> {
    info!("Starting build with design file: {:?}", &args.design);
    let plan = PartialDesign::from_file(&args.design)?.merge_with_cli(&args)?;
    info!("Design resolved to {} strand(s).", plan.strands.len());

    let notifier = Notifier::new();
    let system = build_system(&plan, &notifier)?;
    println!(
        "Built {} strand(s) with {} monomers in total.",
        system.strand_count(),
        system.element_count()
    );

    let outputs = BuildOutputs::from_prefix(&args.output, args.csv);
    write_outputs(&system, plan.box_size, &outputs)?;
    println!("Topology written to: {}", outputs.topology.display());
    println!("Configuration written to: {}", outputs.configuration.display());
    println!("Snapshot written to: {}", outputs.snapshot.display());
    if let Some(csv) = &outputs.csv {
        println!("Coordinates written to: {}", csv.display());
    }
    Ok(())
}

pub fn build_system(plan: &BuildPlan, notifier: &Notifier) -> Result<System> {
    let mut system = System::new();
    for (i, strand_plan) in plan.strands.iter().enumerate() {
        build_strand(&mut system, strand_plan, notifier).map_err(|e| match e {
            CliError::Core(source) => CliError::Config(format!("strand {i}: {source}")),
            other => other,
        })?;
    }
    system.take_updates();
    Ok(system)
}

fn build_strand(system: &mut System, plan: &StrandPlan, notifier: &Notifier) -> Result<()> {
    let strand = system.add_strand(plan.kind, plan.label.clone());
    let seed = system
        .create_monomer(strand, plan.first, plan.seed, notifier)
        .ok_or(EngineError::UnsupportedMonomer {
            symbol: plan.first,
            family: plan.kind,
        })?;
    system.set_from(strand, Some(seed)).map_err(EngineError::from)?;

    let result = workflows::extend::run(system, strand, &plan.extend, notifier)?;
    debug!(
        "Strand '{}' grew by {} monomers.",
        plan.label.as_deref().unwrap_or("<unnamed>"),
        result.added.len()
    );

    if let Some(offset) = &plan.translate {
        for id in std::iter::once(strand).chain(result.complement) {
            system.translate_strand(id, offset).map_err(EngineError::from)?;
        }
    }
    Ok(())
}

/// Edge length of a cubic box holding every monomer with some margin.
fn fitted_box_size(system: &System) -> f64 {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for (id, _) in system.elements_iter() {
        if let Some(frame) = system.frame(id) {
            for axis in 0..3 {
                min[axis] = min[axis].min(frame.position[axis]);
                max[axis] = max[axis].max(frame.position[axis]);
            }
        }
    }
    let extent = (0..3)
        .map(|axis| max[axis] - min[axis])
        .filter(|span| span.is_finite())
        .fold(0.0, f64::max);
    (extent + BOX_MARGIN).max(MIN_BOX_SIZE)
}

pub fn write_outputs(system: &System, box_size: Option<f64>, outputs: &BuildOutputs) -> Result<()> {
    let box_size = box_size.unwrap_or_else(|| fitted_box_size(system));
    debug!("Using a cubic box of edge {:.3}.", box_size);

    OxdnaTopology
        .write_to_path(system, &outputs.topology)
        .map_err(|e| CliError::FileWriting {
            path: outputs.topology.clone(),
            source: e.into(),
        })?;
    OxdnaConfiguration::cubic(box_size)
        .write_to_path(system, &outputs.configuration)
        .map_err(|e| CliError::FileWriting {
            path: outputs.configuration.clone(),
            source: e.into(),
        })?;
    Snapshot::from_system(system)
        .save(&outputs.snapshot)
        .map_err(|e| CliError::FileWriting {
            path: outputs.snapshot.clone(),
            source: e.into(),
        })?;
    if let Some(path) = &outputs.csv {
        CoordinateCsv
            .write_to_path(system, path)
            .map_err(|e| CliError::FileWriting {
                path: path.clone(),
                source: e.into(),
            })?;
    }
    info!("All output files written.");
    Ok(())
}

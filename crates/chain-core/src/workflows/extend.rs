use crate::core::helix::engine::extend_helix;
use crate::core::helix::linear::extend_linear;
use crate::core::helix::params::HelixParams;
use crate::core::models::frame::OrientedFrame;
use crate::core::models::ids::{ElementId, StrandId};
use crate::core::models::strand::{Direction, StrandKind};
use crate::core::models::system::{ChangeKind, System};
use crate::core::notify::Notifier;
use crate::engine::config::ExtendConfig;
use crate::engine::error::EngineError;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendResult {
    /// New monomers of the extended strand, in growth order.
    pub added: Vec<ElementId>,
    /// The paired strand, when one was built.
    pub complement: Option<StrandId>,
}

fn helix_params(kind: StrandKind, config: &ExtendConfig) -> HelixParams {
    config
        .helix
        .or_else(|| HelixParams::for_family(kind.monomer_family()))
        .unwrap_or(HelixParams::B_DNA)
}

#[instrument(skip_all, name = "extend_workflow")]
pub fn run(
    system: &mut System,
    strand: StrandId,
    config: &ExtendConfig,
    notifier: &Notifier,
) -> Result<ExtendResult, EngineError> {
    let view = system
        .strand_view(strand)
        .ok_or(EngineError::StrandNotFound(strand))?;
    let kind = view.kind();
    if view.is_empty() {
        return Err(EngineError::EmptyStrand(strand));
    }
    if view.is_circular() {
        return Err(EngineError::CircularStrand(strand));
    }
    let direction = config.direction.unwrap_or(kind.natural_direction());
    let end = match direction {
        Direction::Toward3 => view.end3(),
        Direction::Toward5 => view.end5(),
    }
    .ok_or(EngineError::EmptyStrand(strand))?;

    // The whole sequence is checked before anything is created.
    let mut symbols = Vec::with_capacity(config.sequence.len());
    for symbol in config.sequence.chars() {
        match kind.resolve_monomer(symbol, notifier) {
            Some((_, canonical)) => symbols.push(canonical),
            None => return Err(EngineError::UnsupportedMonomer { symbol, family: kind }),
        }
    }
    if symbols.is_empty() {
        return Ok(ExtendResult {
            added: Vec::new(),
            complement: None,
        });
    }

    let count = symbols.len();
    let seed = system
        .frame(end)
        .ok_or(EngineError::EmptyStrand(strand))?;
    let family = kind.monomer_family();
    let paired = config.complement && family.is_nucleotide();
    if config.complement && !paired {
        notifier.notify(&format!(
            "Complementary strands are only built for nucleic acids; skipping it for the {} strand.",
            kind
        ));
    }

    let frames = match kind {
        StrandKind::NucleicAcid(_) => {
            let params = helix_params(kind, config);
            extend_helix(&seed, &params, count, direction, paired)?
        }
        StrandKind::Peptide | StrandKind::Generic => extend_linear(
            &seed,
            count,
            direction == kind.natural_direction(),
            config.linear_spacing,
        )?,
    };
    debug!("Generated {} frames for {} new monomers.", frames.len(), count);

    let mut added = Vec::with_capacity(count);
    let mut previous = end;
    for (symbol, frame) in symbols.iter().zip(&frames) {
        let id = system
            .create_monomer(strand, *symbol, *frame, notifier)
            .ok_or(EngineError::UnsupportedMonomer {
                symbol: *symbol,
                family: kind,
            })?;
        match direction {
            Direction::Toward3 => system.link(previous, id),
            Direction::Toward5 => system.link(id, previous),
        }
        previous = id;
        added.push(id);
    }
    system.update_ends(strand)?;

    let complement = if paired {
        Some(build_complement(
            system,
            kind,
            &symbols,
            &frames[count..],
            direction,
            notifier,
        )?)
    } else {
        None
    };

    system.call_updates(&[ChangeKind::Topology, ChangeKind::InstanceOffset]);
    info!(
        "Extended strand by {} monomers{}.",
        added.len(),
        if complement.is_some() {
            " with complement"
        } else {
            ""
        }
    );
    Ok(ExtendResult { added, complement })
}

/// Creates the antiparallel partner strand from the paired frames, which come
/// in reverse growth order.
fn build_complement(
    system: &mut System,
    kind: StrandKind,
    symbols: &[char],
    frames: &[OrientedFrame],
    direction: Direction,
    notifier: &Notifier,
) -> Result<StrandId, EngineError> {
    let family = kind.monomer_family();
    let partner = system.add_strand(kind, None);
    let mut previous: Option<ElementId> = None;

    for (symbol, frame) in symbols.iter().rev().zip(frames) {
        let paired_symbol = family
            .complement(*symbol)
            .ok_or(EngineError::UnsupportedMonomer {
                symbol: *symbol,
                family: kind,
            })?;
        let id = system
            .create_monomer(partner, paired_symbol, *frame, notifier)
            .ok_or(EngineError::UnsupportedMonomer {
                symbol: paired_symbol,
                family: kind,
            })?;
        if let Some(prev) = previous {
            match direction {
                Direction::Toward3 => system.link(prev, id),
                Direction::Toward5 => system.link(id, prev),
            }
        }
        previous = Some(id);
    }

    system.set_from(partner, previous)?;
    Ok(partner)
}

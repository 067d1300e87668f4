//! Batch driver.
//!
//! Weaves every behaviour type of the main module, bases before subclasses.
//! A violation stops the remaining stages of its own type only; the batch
//! carries on so one run reports everything. If any error was reported the
//! woven assembly is dropped.

use std::collections::{HashMap, HashSet};

use netweave_bytecode::{Assembly, TypeId};
use netweave_core::names;

use crate::config::WeaverConfig;
use crate::diagnostics::Diagnostics;
use crate::dirty_bits::{DirtyBitCounts, allocate, start_for};
use crate::generate::Generator;
use crate::marshal::Marshalling;
use crate::rewrite::{Redirects, rewrite_type};
use crate::scan::{ScannedType, check_plain_type, count_sync_members, scan_type};
use crate::{Error, Result};

/// Output of a successful weave.
#[derive(Debug)]
pub struct Woven {
    pub assembly: Assembly,
    /// Warnings only.
    pub diagnostics: Diagnostics,
    /// Types that received generated members, in weaving order.
    pub woven_types: Vec<String>,
    /// Types already carrying the weave marker.
    pub skipped_types: Vec<String>,
    /// Call sites redirected to generated members.
    pub rewritten_sites: usize,
}

pub struct Weaver<'a> {
    marshalling: &'a dyn Marshalling,
    config: WeaverConfig,
}

/// One successfully woven type.
struct WovenType {
    scanned: ScannedType,
    bit_count: u32,
    added: Vec<String>,
    warnings: Diagnostics,
}

/// Per-run bookkeeping shared by all types.
#[derive(Default)]
struct Run {
    diagnostics: Diagnostics,
    counts: DirtyBitCounts,
    redirects: Redirects,
    generated: HashMap<TypeId, HashSet<String>>,
    woven: Vec<String>,
    skipped: Vec<TypeId>,
}

impl<'a> Weaver<'a> {
    pub fn new(marshalling: &'a dyn Marshalling) -> Self {
        Self {
            marshalling,
            config: WeaverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WeaverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &WeaverConfig {
        &self.config
    }

    /// Weave `assembly`, or report every diagnostic and return nothing.
    pub fn weave(&self, mut assembly: Assembly) -> Result<Woven> {
        let run = self.weave_types(&mut assembly);
        if run.diagnostics.has_errors() {
            log::info!(
                "weaving failed with {} errors, nothing written",
                run.diagnostics.error_count()
            );
            return Err(Error::WeaveFailed(run.diagnostics));
        }

        let mut rewritten_sites = 0;
        if !run.redirects.is_empty() {
            let none = HashSet::new();
            for id in assembly.main_types() {
                if run.skipped.contains(&id) {
                    continue;
                }
                let exclude = run.generated.get(&id).unwrap_or(&none);
                rewritten_sites += rewrite_type(assembly.get_mut(id), &run.redirects, exclude);
            }
        }

        let skipped_types = run
            .skipped
            .iter()
            .map(|&id| assembly.get(id).name.clone())
            .collect();
        Ok(Woven {
            assembly,
            diagnostics: run.diagnostics,
            woven_types: run.woven,
            skipped_types,
            rewritten_sites,
        })
    }

    /// Every diagnostic a weave of `assembly` would report.
    pub fn check(&self, assembly: &Assembly) -> Diagnostics {
        let mut scratch = assembly.clone();
        self.weave_types(&mut scratch).diagnostics
    }

    fn weave_types(&self, assembly: &mut Assembly) -> Run {
        if let Some(module) = &self.config.main_module {
            assembly.set_main_module(module.as_str());
        }
        let mut run = Run::default();

        let (behaviours, plain): (Vec<TypeId>, Vec<TypeId>) = assembly
            .main_types()
            .into_iter()
            .partition(|&id| assembly.is_derived_from(id, names::NETWORK_BEHAVIOUR));
        for id in plain {
            run.diagnostics.extend(check_plain_type(assembly, id));
        }

        let mut order = behaviours;
        order.sort_by_key(|&id| assembly.base_chain(id).len());
        log::info!(
            "weaving {} behaviour types in `{}`",
            order.len(),
            assembly.main_module()
        );

        for id in order {
            let name = assembly.get(id).name.clone();
            if assembly.get(id).has_method(names::WEAVE_MARKER) {
                log::debug!("{name}: already woven, skipped");
                let count = start_for(assembly, &run.counts, id) + count_sync_members(assembly, id);
                run.counts.record(&name, count);
                run.skipped.push(id);
                continue;
            }

            match self.weave_type(assembly, id, &run.counts) {
                Ok(WovenType {
                    scanned,
                    bit_count,
                    added,
                    warnings,
                }) => {
                    log::info!(
                        "{name}: woven, {} synchronized members, {} remote calls, {} events",
                        scanned.members.len(),
                        scanned.remotes().count(),
                        scanned.events.len()
                    );
                    run.counts.record(&name, bit_count);
                    run.redirects.add_type(&scanned);
                    run.generated.insert(id, added.into_iter().collect());
                    run.diagnostics.extend(warnings);
                    run.woven.push(name);
                }
                Err(diagnostics) => {
                    log::debug!("{name}: {} errors", diagnostics.error_count());
                    run.diagnostics.extend(diagnostics);
                }
            }
        }
        run
    }

    /// Scan, allocate and generate one type.
    fn weave_type(
        &self,
        assembly: &mut Assembly,
        id: TypeId,
        counts: &DirtyBitCounts,
    ) -> std::result::Result<WovenType, Diagnostics> {
        let (mut scanned, mut warnings) = scan_type(assembly, id, &self.config)?;

        let start = start_for(assembly, counts, id);
        let bit_count = match allocate(&scanned.name, start, &mut scanned.members) {
            Ok(count) => count,
            Err(violation) => {
                warnings.push(violation);
                return Err(warnings);
            }
        };

        match Generator::new(assembly, &scanned, self.marshalling, &self.config).run() {
            Ok(added) => Ok(WovenType {
                scanned,
                bit_count,
                added,
                warnings,
            }),
            Err(violation) => {
                warnings.push(violation);
                Err(warnings)
            }
        }
    }
}

//! The Buchberger scheduler: pair queue, criteria and basis bookkeeping.

use chrono::{DateTime, Local};
use num_traits::Zero;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

use crate::{
    config::{GbConfig, Verbosity},
    degree::Degree,
    error::{ErrorCode, GbError, Result},
    gpair::{GPair, GPairList},
    gpoly::{GPoly, GPolyId},
    poly::{
        coefficient::Coefficient,
        monomial::Monomial,
        polynomial::FastPolynomial,
    },
    reductors::Reductors,
    ring_info::{GRingInfo, InputAndGrading},
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counters of one computation. Purely diagnostic.
#[derive(Debug, Clone)]
pub struct GbStats {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub pairs_created: usize,
    pub spolys_computed: usize,
    pub zero_reductions: usize,
    pub polys_added: usize,
    /// coprime pairs skipped when popped
    pub coprime_skipped: usize,
    /// coprime pairs dropped when built
    pub coprime_discarded: usize,
    pub gm_discarded: usize,
    pub b_discarded: usize,
    pub deactivated: usize,
    /// basis elements whose tails were reduced by a newer element
    pub interreduced: usize,
    pub reduction_steps: usize,
    pub degree_steps: usize,
    pub dehomog_saved: usize,
    pub max_pending: usize,
}

impl Default for GbStats {
    fn default() -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            pairs_created: 0,
            spolys_computed: 0,
            zero_reductions: 0,
            polys_added: 0,
            coprime_skipped: 0,
            coprime_discarded: 0,
            gm_discarded: 0,
            b_discarded: 0,
            deactivated: 0,
            interreduced: 0,
            reduction_steps: 0,
            degree_steps: 0,
            dehomog_saved: 0,
            max_pending: 0,
        }
    }
}

impl GbStats {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Local::now) - self.started_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductorState {
    Unprepared,
    MainLoop,
    Finalized,
}

/// Drives one Gröbner basis computation over a fixed ring.
///
/// The basis lives in an append-only arena; the input polynomials occupy the
/// first slots and never take part in pairs themselves, their reductions do.
pub struct GReductor<C: Coefficient, M: Monomial> {
    ring: Arc<GRingInfo>,
    config: GbConfig,
    inputs: Vec<FastPolynomial<C, M>>,
    polys: Vec<GPoly<C, M>>,
    gb: Vec<GPolyId>,
    reductors: Reductors<C, M>,
    pairs: GPairList<M>,
    spoly: GPoly<C, M>,
    current_pair: Option<GPair<M>>,
    current_sugar: Option<Degree>,
    age: usize,
    min_gen_inputs: Vec<usize>,
    stats: GbStats,
    state: ReductorState,
}

impl<C: Coefficient, M: Monomial> GReductor<C, M> {
    /// Zero inputs are skipped; a list of zeros yields the empty basis.
    pub fn new(
        ring: &Arc<GRingInfo>,
        inputs: Vec<FastPolynomial<C, M>>,
        config: GbConfig,
    ) -> Result<Self> {
        const OP: &str = "GReductor::new";
        if inputs.is_empty() {
            return Err(GbError::new(ErrorCode::EmptyInput, OP));
        }
        if inputs
            .iter()
            .any(|f| f.max_indet().map_or(false, |v| v >= ring.num_indets()))
        {
            return Err(GbError::new(ErrorCode::MixedRings, OP));
        }
        Ok(Self {
            reductors: Reductors::new(ring, config.borel, config.borel_threshold, config.cog),
            spoly: GPoly::zero(ring),
            ring: ring.clone(),
            config,
            inputs,
            polys: Vec::new(),
            gb: Vec::new(),
            pairs: GPairList::new(),
            current_pair: None,
            current_sugar: None,
            age: 0,
            min_gen_inputs: Vec::new(),
            stats: GbStats::default(),
            state: ReductorState::Unprepared,
        })
    }

    pub fn ring(&self) -> &Arc<GRingInfo> {
        &self.ring
    }

    pub fn state(&self) -> ReductorState {
        self.state
    }

    pub fn stats(&self) -> &GbStats {
        &self.stats
    }

    pub fn num_pending_pairs(&self) -> usize {
        self.pairs.len()
    }

    fn logs(&self, level: Verbosity) -> bool {
        self.config.verbosity >= level
    }

    /// Wraps the inputs, sets their sugar and queues one input pair each.
    pub fn prepare_gbasis(&mut self) {
        assert_eq!(self.state, ReductorState::Unprepared, "prepare_gbasis called twice");
        self.stats = GbStats::default();
        let inputs = std::mem::take(&mut self.inputs);
        let mut input_pairs = Vec::with_capacity(inputs.len());
        for (position, f) in inputs.into_iter().enumerate() {
            if f.is_zero() {
                continue;
            }
            let mut g = GPoly::new(f, &self.ring);
            g.initialize_sugar();
            g.set_age(position);
            // input slots only feed their input pair
            g.deactivate();
            let id = GPolyId(self.polys.len());
            self.polys.push(g);
            input_pairs.push(GPair::input(id, &self.polys[id.0], position));
        }
        self.age = self.polys.len();
        self.pairs.merge(input_pairs);
        self.stats.max_pending = self.pairs.len();
        self.state = ReductorState::MainLoop;

        if self.logs(Verbosity::Summary) {
            info!(
                time = %self.stats.started_at.format(TIME_FORMAT),
                inputs = self.polys.len(),
                grading = ?self.ring.input_and_grading(),
                sugar = ?self.ring.sugar_kind(),
                encoding = ?self.ring.encoding(),
                "gbasis start"
            );
        }
    }

    /// Pops the lowest pair and reduces its S-polynomial into `self.spoly`,
    /// which stays zero for skipped pairs.
    pub fn reduce_current_spoly(&mut self) -> Result<()> {
        const OP: &str = "GReductor::reduce_current_spoly";
        assert_eq!(self.state, ReductorState::MainLoop, "reduction outside the main loop");
        let pair = self
            .pairs
            .pop_front()
            .ok_or(GbError::new(ErrorCode::Internal, OP))?;
        debug_assert!(pair.sugar().is_some(), "queued pair without sugar");
        let sugar = pair
            .sugar()
            .map(|s| s.value().clone())
            .ok_or(GbError::new(ErrorCode::Internal, OP))?;
        self.spoly = GPoly::zero(&self.ring);

        if self.current_sugar.as_ref() != Some(&sugar) {
            self.current_sugar = Some(sugar.clone());
            self.stats.degree_steps += 1;
            self.reductors.borel_reductors_update_in_next_degree();
            if self.logs(Verbosity::Degree) {
                debug!(
                    time = %Local::now().format(TIME_FORMAT),
                    sugar = ?sugar,
                    pending = self.pairs.len() + 1,
                    basis = self.gb.len(),
                    "new degree"
                );
            }
        }

        if self.config.criteria.coprime && pair.is_coprime() {
            self.stats.coprime_skipped += 1;
            self.current_pair = Some(pair);
            return Ok(());
        }
        if !pair.is_input() {
            self.stats.spolys_computed += 1;
        }

        self.age += 1;
        let mut spoly = GPoly::zero(&self.ring);
        spoly.assign_spoly(&pair, &self.polys, self.age);
        self.stats.reduction_steps += spoly.reduce(&mut self.reductors, &self.polys, self.config.cog);
        if spoly.is_zero() {
            self.stats.zero_reductions += 1;
        }
        self.spoly = spoly;
        self.current_pair = Some(pair);
        Ok(())
    }

    /// Strips the saturating indeterminate from the current polynomial and
    /// reduces again until nothing more can be stripped.
    fn dehomog_current_spoly(&mut self) {
        loop {
            let saved = self.spoly.smart_dehomog();
            if saved == 0 {
                break;
            }
            self.stats.dehomog_saved += saved as usize;
            self.stats.reduction_steps +=
                self.spoly
                    .reduce(&mut self.reductors, &self.polys, self.config.cog);
            if self.spoly.is_zero() {
                break;
            }
        }
    }

    /// Accepts the nonzero current polynomial: interreduces, registers it and
    /// builds its pairs under the enabled criteria. Returns its handle.
    pub fn update_basis_and_pairs(&mut self) -> Result<GPolyId> {
        assert!(!self.spoly.is_zero(), "accepting a zero polynomial");
        let mut g = GPoly::zero(&self.ring);
        g.assign_clear(&mut self.spoly);
        let id = GPolyId(self.polys.len());

        let from_input = self.current_pair.as_ref().and_then(|p| p.input_position());
        if let Some(position) = from_input {
            if self.ring.input_and_grading() == InputAndGrading::AllGraded {
                self.min_gen_inputs.push(position);
                g.set_minimal_gen_level(self.stats.degree_steps);
            }
        }

        let unit = g.lpp().is_constant() && !self.ring.is_module();
        self.polys.push(g);

        if unit {
            // the ideal is the whole ring
            let dropped = self.pairs.retain(|_| false);
            self.stats.gm_discarded += dropped;
            for &old in self.gb.iter() {
                if self.polys[old.0].is_active() {
                    self.polys[old.0].deactivate();
                    self.stats.deactivated += 1;
                }
            }
        } else if self.config.interreduce {
            if self.ring.interreduces_in_loop() {
                self.stats.interreduced += self.reductors.ordered_interreduce(id, &mut self.polys);
            } else if self.ring.sat_indet().is_some() {
                // dehomogenised elements break the degree order of the table
                self.stats.interreduced += self.reductors.interreduce(id, &mut self.polys);
            }
        }

        self.reductors.insert(id, &self.polys[id.0], 0);
        self.stats.polys_added += 1;
        if !unit {
            self.build_pairs(id)?;
        }
        self.gb.push(id);
        self.stats.max_pending = self.stats.max_pending.max(self.pairs.len());

        if self.logs(Verbosity::Poly) {
            let g = &self.polys[id.0];
            trace!(
                time = %Local::now().format(TIME_FORMAT),
                lpp = ?g.lpp(),
                terms = g.num_terms(),
                sugar = ?g.sugar().value(),
                pending = self.pairs.len(),
                "polynomial added"
            );
        }
        Ok(id)
    }

    /// Gebauer–Möller insertion into the pairs of one new polynomial.
    fn gm_insert(new_pairs: &mut Vec<GPair<M>>, pair: GPair<M>, stats: &mut GbStats) {
        if let Some(q) = new_pairs.iter_mut().find(|q| q.lcm().divides(pair.lcm())) {
            // equal lcms: keep the coprime one, it is skipped for free
            if q.lcm().pp() == pair.lcm().pp() && pair.is_coprime() && !q.is_coprime() {
                *q = pair;
            }
            stats.gm_discarded += 1;
            return;
        }
        let before = new_pairs.len();
        new_pairs.retain(|q| !pair.lcm().divides(q.lcm()));
        stats.gm_discarded += before - new_pairs.len();
        new_pairs.push(pair);
    }

    fn build_pairs(&mut self, id: GPolyId) -> Result<()> {
        let criteria = self.config.criteria;
        let rule = self.ring.div_mask_rule();
        let new = &self.polys[id.0];

        if criteria.backwards {
            let polys = &self.polys;
            let dropped = self.pairs.retain(|p| {
                let Some(second) = p.second() else {
                    return true;
                };
                let (i, j) = (&polys[p.first().0], &polys[second.0]);
                if p.component() != new.component()
                    || !i.is_active()
                    || !j.is_active()
                    || !new.lpp_for_div().divides(p.lcm())
                {
                    return true;
                }
                let lcm_i = i.lpp_for_div().lcm(new.lpp_for_div(), rule);
                let lcm_j = j.lpp_for_div().lcm(new.lpp_for_div(), rule);
                lcm_i.pp() == p.lcm().pp() || lcm_j.pp() == p.lcm().pp()
            });
            self.stats.b_discarded += dropped;
        }

        let mut new_pairs = Vec::new();
        let mut redundant = Vec::new();
        for &old in self.gb.iter() {
            let g = &self.polys[old.0];
            if !g.is_active() || g.component() != new.component() {
                continue;
            }
            let pair = GPair::new(old, g, id, new);
            self.stats.pairs_created += 1;
            if criteria.divisibility && new.lpp_for_div().divides(g.lpp_for_div()) {
                redundant.push(old);
            }
            if criteria.gebauer_moeller {
                Self::gm_insert(&mut new_pairs, pair, &mut self.stats);
            } else {
                new_pairs.push(pair);
            }
        }

        if criteria.coprime {
            let before = new_pairs.len();
            new_pairs.retain(|p| !p.is_coprime());
            self.stats.coprime_discarded += before - new_pairs.len();
        }
        for pair in new_pairs.iter_mut() {
            pair.complete(&self.polys)?;
        }
        self.pairs.merge(new_pairs);

        for old in redundant {
            self.polys[old.0].deactivate();
            self.stats.deactivated += 1;
        }
        Ok(())
    }

    /// Main loop for every ring without a saturating indeterminate.
    #[instrument(skip_all)]
    pub fn do_gbasis(&mut self) -> Result<()> {
        assert!(self.ring.sat_indet().is_none(), "use do_sat_gbasis");
        while !self.pairs.is_empty() {
            self.main_loop_step(false)?;
        }
        Ok(())
    }

    /// Main loop of the saturating algorithm: every accepted polynomial is
    /// divided by the largest power of the last indeterminate first, so its
    /// pairs are built from the dehomogenised leading term.
    #[instrument(skip_all)]
    pub fn do_sat_gbasis(&mut self) -> Result<()> {
        assert!(self.ring.sat_indet().is_some(), "no saturating indeterminate");
        while !self.pairs.is_empty() {
            self.main_loop_step(true)?;
        }
        Ok(())
    }

    fn main_loop_step(&mut self, saturating: bool) -> Result<Option<GPolyId>> {
        self.reduce_current_spoly()?;
        if saturating && !self.spoly.is_zero() {
            self.dehomog_current_spoly();
        }
        if self.spoly.is_zero() {
            return Ok(None);
        }
        self.update_basis_and_pairs().map(Some)
    }

    /// One iteration of the main loop on a prepared reductor: reduces the
    /// lowest pending pair and accepts the result when it is nonzero.
    /// Returns the accepted element, if any.
    pub fn step(&mut self) -> Result<Option<GPolyId>> {
        if self.pairs.is_empty() {
            return Ok(None);
        }
        let saturating = self.ring.sat_indet().is_some();
        self.main_loop_step(saturating)
    }

    pub fn poly(&self, id: GPolyId) -> &GPoly<C, M> {
        &self.polys[id.0]
    }

    /// Interreduces the basis unless the main loop already kept it reduced.
    pub fn finalize_gbasis(&mut self) {
        assert_eq!(self.state, ReductorState::MainLoop, "finalize before the main loop");
        if !(self.ring.interreduces_in_loop() && self.config.interreduce) {
            while self.final_sweep() {}
        }
        self.state = ReductorState::Finalized;
        self.stats.finished_at = Some(Local::now());

        if self.logs(Verbosity::Summary) {
            info!(
                time = %Local::now().format(TIME_FORMAT),
                basis = self.gbasis_gpolys().count(),
                spolys = self.stats.spolys_computed,
                zero = self.stats.zero_reductions,
                elapsed_ms = self.stats.elapsed().num_milliseconds(),
                "gbasis end"
            );
        }
    }

    /// One pass of full reduction of every active element by all the others.
    /// Returns whether some leading power-product changed.
    fn final_sweep(&mut self) -> bool {
        let mut lpp_changed = false;
        for id in self.gb.clone() {
            if !self.polys[id.0].is_active() {
                continue;
            }
            self.reductors.set_not_to_be_used(id, true);
            let fresh = GPoly::zero(&self.ring);
            let mut g = std::mem::replace(&mut self.polys[id.0], fresh);
            let before = g.lpp().clone();
            self.stats.reduction_steps += g.reduce(&mut self.reductors, &self.polys, self.config.cog);
            if g.is_zero() {
                g.deactivate();
                self.stats.deactivated += 1;
                self.reductors.remove(id);
                self.polys[id.0] = g;
                continue;
            }
            self.polys[id.0] = g;
            if self.polys[id.0].lpp() != &before {
                lpp_changed = true;
                self.reductors.reinsert(id, &self.polys[id.0]);
                self.stats.interreduced += self.reductors.super_interreduce(id, &mut self.polys);
            } else {
                self.reductors.set_not_to_be_used(id, false);
            }
        }
        lpp_changed
    }

    /// Prepares, runs the fitting main loop and finalizes.
    pub fn run(&mut self) -> Result<()> {
        self.prepare_gbasis();
        if self.ring.sat_indet().is_some() {
            self.do_sat_gbasis()?;
        } else {
            self.do_gbasis()?;
        }
        self.finalize_gbasis();
        Ok(())
    }

    /// Active basis elements, ascending by leading power-product.
    pub fn gbasis_gpolys(&self) -> impl Iterator<Item = &GPoly<C, M>> + '_ {
        let mut active: Vec<&GPoly<C, M>> = self
            .gb
            .iter()
            .map(|id| &self.polys[id.0])
            .filter(|g| g.is_active() && !g.is_zero())
            .collect();
        active.sort_by(|a, b| a.lpp().cmp(b.lpp()));
        active.into_iter()
    }

    pub fn gbasis(&self) -> Vec<FastPolynomial<C, M>> {
        assert_eq!(self.state, ReductorState::Finalized, "basis read before finalize");
        self.gbasis_gpolys()
            .map(|g| {
                let mut f = g.poly().clone();
                f.normalize_result();
                f
            })
            .collect()
    }

    /// Input positions that became minimal generators, ascending.
    pub fn min_gens(&self) -> Result<Vec<usize>> {
        if self.ring.input_and_grading() != InputAndGrading::AllGraded {
            return Err(GbError::new(ErrorCode::NotHomogeneous, "GReductor::min_gens"));
        }
        let mut positions = self.min_gen_inputs.clone();
        positions.sort_unstable();
        Ok(positions)
    }
}

//! The fast/slow/cheap fee selector.

use std::time::Duration;

use serde::Serialize;
use strum::IntoEnumIterator;
use wallet_api::fee_mode::describe_wait;
use wallet_api::fee_mode::TransactionFeeMode;

use super::TransactionData;
use crate::error::FeeTooExpensiveError;

/// Candidate transactions computed by the wallet engine, one per fee tier.
///
/// A missing candidate means the wallet cannot afford that tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeeCandidates {
    pub fast: Option<TransactionData>,
    pub slow: Option<TransactionData>,
    pub cheap: Option<TransactionData>,
}

impl FeeCandidates {
    pub fn get(&self, mode: TransactionFeeMode) -> Option<&TransactionData> {
        match mode {
            TransactionFeeMode::Fast => self.fast.as_ref(),
            TransactionFeeMode::Slow => self.slow.as_ref(),
            TransactionFeeMode::Cheap => self.cheap.as_ref(),
        }
    }

    pub fn with(mut self, mode: TransactionFeeMode, data: TransactionData) -> Self {
        let slot = match mode {
            TransactionFeeMode::Fast => &mut self.fast,
            TransactionFeeMode::Slow => &mut self.slow,
            TransactionFeeMode::Cheap => &mut self.cheap,
        };
        *slot = Some(data);
        self
    }

    pub fn without(mut self, mode: TransactionFeeMode) -> Self {
        match mode {
            TransactionFeeMode::Fast => self.fast = None,
            TransactionFeeMode::Slow => self.slow = None,
            TransactionFeeMode::Cheap => self.cheap = None,
        }
        self
    }
}

/// One selectable fee tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjustableFeeSegment {
    pub mode: TransactionFeeMode,
    pub title: &'static str,
    pub wait_time: Duration,
    /// False when the wallet cannot afford this tier.
    pub is_selectable: bool,
    pub is_selected: bool,
}

impl AdjustableFeeSegment {
    pub fn wait_description(&self) -> String {
        describe_wait(self.wait_time)
    }
}

/// The three fee tiers plus the transaction data for the selected one.
///
/// Exactly one segment is selected at all times. The model is immutable:
/// selecting a tier produces a new model and leaves this one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustableFeeModel {
    segments: [AdjustableFeeSegment; 3],
    candidates: FeeCandidates,
    transaction_data: Option<TransactionData>,
}

impl AdjustableFeeModel {
    /// Builds the selector, preselecting `preferred` if it is affordable and
    /// otherwise the first affordable tier in fast, slow, cheap order.
    ///
    /// Returns `None` when no tier is affordable.
    pub fn new(candidates: FeeCandidates, preferred: TransactionFeeMode) -> Option<Self> {
        let selected = if candidates.get(preferred).is_some() {
            preferred
        } else {
            TransactionFeeMode::iter().find(|mode| candidates.get(*mode).is_some())?
        };

        let segments = [
            TransactionFeeMode::Fast,
            TransactionFeeMode::Slow,
            TransactionFeeMode::Cheap,
        ]
        .map(|mode| AdjustableFeeSegment {
            mode,
            title: mode.title(),
            wait_time: mode.estimated_wait(),
            is_selectable: candidates.get(mode).is_some(),
            is_selected: mode == selected,
        });
        let transaction_data = candidates.get(selected).cloned();

        Some(Self {
            segments,
            candidates,
            transaction_data,
        })
    }

    /// Segments ordered fast, slow, cheap.
    pub fn segments(&self) -> &[AdjustableFeeSegment] {
        &self.segments
    }

    pub fn segment(&self, mode: TransactionFeeMode) -> &AdjustableFeeSegment {
        match mode {
            TransactionFeeMode::Fast => &self.segments[0],
            TransactionFeeMode::Slow => &self.segments[1],
            TransactionFeeMode::Cheap => &self.segments[2],
        }
    }

    pub fn is_selectable(&self, mode: TransactionFeeMode) -> bool {
        self.segment(mode).is_selectable
    }

    pub fn selected_segment(&self) -> &AdjustableFeeSegment {
        // construction and copy_selecting both keep exactly one segment selected
        self.segments
            .iter()
            .find(|segment| segment.is_selected)
            .unwrap_or(&self.segments[0])
    }

    pub fn selected_mode(&self) -> TransactionFeeMode {
        self.selected_segment().mode
    }

    /// The candidate transaction for the selected tier, if one was computed.
    pub fn transaction_data(&self) -> Option<&TransactionData> {
        self.transaction_data.as_ref()
    }

    /// Fee of the selected tier, in satoshis.
    pub fn network_fee_sats(&self) -> u64 {
        self.transaction_data
            .as_ref()
            .or_else(|| self.candidates.get(self.selected_mode()))
            .map_or(0, |data| data.fee_sats)
    }

    /// Returns a copy with `mode` selected and its transaction data recomputed.
    ///
    /// `recompute` is only invoked for affordable tiers. If the tier is not
    /// selectable, or the recomputation finds it unaffordable, the error is
    /// returned and no new model is produced.
    pub fn copy_selecting(
        &self,
        mode: TransactionFeeMode,
        recompute: impl FnOnce(TransactionFeeMode) -> Option<TransactionData>,
    ) -> Result<Self, FeeTooExpensiveError> {
        if !self.is_selectable(mode) {
            return Err(FeeTooExpensiveError { mode });
        }
        let data = recompute(mode).ok_or(FeeTooExpensiveError { mode })?;

        let mut next = self.clone();
        for segment in next.segments.iter_mut() {
            segment.is_selected = segment.mode == mode;
        }
        next.candidates = next.candidates.with(mode, data.clone());
        next.transaction_data = Some(data);
        Ok(next)
    }

    /// Returns a copy in which `mode` can no longer be selected.
    ///
    /// The selected tier is never marked; the selection is unchanged.
    pub fn marking_unaffordable(&self, mode: TransactionFeeMode) -> Self {
        let mut next = self.clone();
        if mode == self.selected_mode() {
            return next;
        }
        for segment in next.segments.iter_mut().filter(|segment| segment.mode == mode) {
            segment.is_selectable = false;
        }
        next.candidates = next.candidates.without(mode);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> FeeCandidates {
        FeeCandidates::default()
            .with(TransactionFeeMode::Fast, TransactionData::new(50_000, 2_000))
            .with(TransactionFeeMode::Slow, TransactionData::new(50_000, 800))
            .with(TransactionFeeMode::Cheap, TransactionData::new(50_000, 150))
    }

    fn selected_count(model: &AdjustableFeeModel) -> usize {
        model.segments().iter().filter(|s| s.is_selected).count()
    }

    #[test]
    fn preselects_preferred_tier() {
        let model = AdjustableFeeModel::new(candidates(), TransactionFeeMode::Cheap).unwrap();
        assert_eq!(model.selected_mode(), TransactionFeeMode::Cheap);
        assert_eq!(model.network_fee_sats(), 150);
        assert_eq!(selected_count(&model), 1);

        let titles: Vec<_> = model.segments().iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Fast", "Slow", "Cheap"]);
        assert_eq!(model.segment(TransactionFeeMode::Slow).wait_description(), "~1 hour");
    }

    #[test]
    fn falls_back_to_first_affordable_tier() {
        let only_cheap = FeeCandidates::default()
            .with(TransactionFeeMode::Cheap, TransactionData::new(50_000, 150));
        let model = AdjustableFeeModel::new(only_cheap, TransactionFeeMode::Fast).unwrap();
        assert_eq!(model.selected_mode(), TransactionFeeMode::Cheap);
        assert!(!model.is_selectable(TransactionFeeMode::Fast));
        assert!(!model.is_selectable(TransactionFeeMode::Slow));

        assert!(AdjustableFeeModel::new(FeeCandidates::default(), TransactionFeeMode::Fast).is_none());
    }

    #[test]
    fn selecting_affordable_tier_recomputes_its_data() {
        let model = AdjustableFeeModel::new(candidates(), TransactionFeeMode::Fast).unwrap();
        let fresh = TransactionData::new(50_000, 777);

        let next = model
            .copy_selecting(TransactionFeeMode::Slow, |mode| {
                assert_eq!(mode, TransactionFeeMode::Slow);
                Some(fresh.clone())
            })
            .unwrap();

        assert!(next.segment(TransactionFeeMode::Slow).is_selected);
        assert!(!next.segment(TransactionFeeMode::Fast).is_selected);
        assert!(!next.segment(TransactionFeeMode::Cheap).is_selected);
        assert_eq!(next.transaction_data(), Some(&fresh));
        assert_eq!(next.network_fee_sats(), 777);

        // the previous model is untouched
        assert_eq!(model.selected_mode(), TransactionFeeMode::Fast);
        assert_eq!(model.network_fee_sats(), 2_000);
    }

    #[test]
    fn selecting_unaffordable_tier_is_rejected() {
        let no_slow = FeeCandidates {
            slow: None,
            ..candidates()
        };
        let model = AdjustableFeeModel::new(no_slow, TransactionFeeMode::Fast).unwrap();
        let before = model.clone();

        let mut recomputed = false;
        let result = model.copy_selecting(TransactionFeeMode::Slow, |_| {
            recomputed = true;
            None
        });

        assert_eq!(
            result,
            Err(FeeTooExpensiveError {
                mode: TransactionFeeMode::Slow
            })
        );
        assert!(!recomputed);
        assert_eq!(model, before);
    }

    #[test]
    fn recomputation_finding_tier_unaffordable_is_rejected() {
        let model = AdjustableFeeModel::new(candidates(), TransactionFeeMode::Fast).unwrap();
        assert_eq!(
            model.copy_selecting(TransactionFeeMode::Cheap, |_| None),
            Err(FeeTooExpensiveError {
                mode: TransactionFeeMode::Cheap
            })
        );
    }

    #[test]
    fn marking_tier_unaffordable_keeps_selection() {
        let model = AdjustableFeeModel::new(candidates(), TransactionFeeMode::Fast).unwrap();

        let marked = model.marking_unaffordable(TransactionFeeMode::Slow);
        assert!(!marked.is_selectable(TransactionFeeMode::Slow));
        assert!(marked.is_selectable(TransactionFeeMode::Cheap));
        assert_eq!(marked.selected_mode(), TransactionFeeMode::Fast);
        assert_eq!(marked.transaction_data(), model.transaction_data());
        assert!(marked
            .copy_selecting(TransactionFeeMode::Slow, |_| unreachable!())
            .is_err());

        // the selected tier stays selectable
        assert_eq!(model.marking_unaffordable(TransactionFeeMode::Fast), model);
    }

    #[test]
    fn exactly_one_segment_selected_across_transitions() {
        let mut model = AdjustableFeeModel::new(candidates(), TransactionFeeMode::Slow).unwrap();
        let sequence = [
            TransactionFeeMode::Cheap,
            TransactionFeeMode::Fast,
            TransactionFeeMode::Fast,
            TransactionFeeMode::Slow,
        ];
        for mode in sequence {
            model = model
                .copy_selecting(mode, |m| model.candidates.get(m).cloned())
                .unwrap();
            assert_eq!(selected_count(&model), 1);
            assert_eq!(model.selected_mode(), mode);
        }
    }
}

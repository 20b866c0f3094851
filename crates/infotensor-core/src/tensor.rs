//! Labeled joint-probability tensor.
//!
//! A [`ProbabilityTensor`] is an N-dimensional array of probability mass
//! whose axes are named by [`Label`]s. Every public operation addresses axes
//! by selector strings and expands base labels, so `"X"` stands for all of
//! `X_1, X_2, ...`.
//!
//! # Mutation convention
//!
//! Methods taking `&self` are pure and return a new tensor. The only methods
//! taking `&mut self` are [`normalize`](ProbabilityTensor::normalize),
//! [`reorder_to`](ProbabilityTensor::reorder_to) and
//! [`randomize`](ProbabilityTensor::randomize); they validate their input
//! before touching any state.
//!
//! # Normalization
//!
//! Reductions (marginalization, shrinking), reshapes (joins) and reorders
//! keep the `normalized` flag. Bin slicing and conditioning clear it until
//! an explicit [`normalize`](ProbabilityTensor::normalize).

use std::borrow::Cow;

use ndarray::{Array1, Array2, ArrayD, Axis, Ix1, Ix2, IxDyn, Zip};
use rand::Rng;
use rand::seq::{SliceRandom, index};

use crate::error::{Error, Result};
use crate::label::{Label, expand_axes};
use crate::numeric::{NORMALIZATION_TOLERANCE, check_fraction, zero_non_finite};

/// N-dimensional probability (or conditional probability) mass with one
/// label per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTensor {
    labels: Vec<Label>,
    mass: ArrayD<f64>,
    normalized: bool,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Build a tensor from a mass array and one label per axis.
    ///
    /// Fails when the array is empty, when the label count differs from the
    /// rank, when labels repeat, when a cell lies outside [0, 1], or when
    /// `normalized` is claimed but the mass does not sum to 1.
    pub fn new<I, L>(mass: ArrayD<f64>, labels: I, normalized: bool) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        validate_layout(&mass, &labels)?;
        if let Some((index, &value)) = mass
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(Error::MassOutOfRange { index, value });
        }
        if normalized {
            let sum = mass.sum();
            if (sum - 1.0).abs() > NORMALIZATION_TOLERANCE {
                return Err(Error::NotNormalized { sum });
            }
        }
        Ok(Self {
            labels,
            mass,
            normalized,
        })
    }

    /// Build a tensor from a flat row-major value list and its shape.
    pub fn from_shape_vec<I, L>(
        shape: &[usize],
        values: Vec<f64>,
        labels: I,
        normalized: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let mass = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(mass, labels, normalized)
    }

    /// Build a normalized tensor from bin counts.
    ///
    /// Counts must be finite and non-negative with a positive total.
    pub fn from_counts<I, L>(counts: ArrayD<f64>, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        validate_layout(&counts, &labels)?;
        if let Some((index, &value)) = counts
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::InvalidCount { index, value });
        }
        let mut tensor = Self {
            labels,
            mass: counts,
            normalized: false,
        };
        tensor.normalize()?;
        Ok(tensor)
    }

    /// Internal constructor for results of the tensor algebra.
    fn derived(labels: Vec<Label>, mass: ArrayD<f64>, normalized: bool) -> Self {
        debug_assert_eq!(labels.len(), mass.ndim());
        Self {
            labels,
            mass,
            normalized,
        }
    }
}

fn validate_layout(mass: &ArrayD<f64>, labels: &[Label]) -> Result<()> {
    if mass.ndim() == 0 || mass.is_empty() {
        return Err(Error::Empty);
    }
    if mass.ndim() != labels.len() {
        return Err(Error::RankMismatch {
            rank: mass.ndim(),
            labels: labels.len(),
        });
    }
    for (i, label) in labels.iter().enumerate() {
        if labels[..i].contains(label) {
            return Err(Error::DuplicateLabel(label.to_string()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Axis labels in axis order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Axis labels rendered as strings.
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(Label::to_string).collect()
    }

    /// The mass array.
    pub fn mass(&self) -> &ArrayD<f64> {
        &self.mass
    }

    /// Consume the tensor and return its mass array.
    pub fn into_mass(self) -> ArrayD<f64> {
        self.mass
    }

    /// Number of bins along every axis.
    pub fn shape(&self) -> &[usize] {
        self.mass.shape()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.labels.len()
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Sum of all cells.
    pub fn total_mass(&self) -> f64 {
        self.mass.sum()
    }

    /// True when an axis is named exactly `name`.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.is_named(name))
    }

    /// Axis position of the label named exactly `name`.
    pub fn axis_of(&self, name: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l.is_named(name))
            .ok_or_else(|| Error::UnknownLabel(name.to_string()))
    }

    /// Number of bins of the axis named exactly `name`.
    pub fn label_size(&self, name: &str) -> Result<usize> {
        Ok(self.mass.shape()[self.axis_of(name)?])
    }

    /// Axis positions addressed by `selectors` (base labels expanded).
    /// An empty selector list is [`Error::NoLabels`].
    pub fn resolve<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<usize>> {
        expand_axes(selectors, &self.labels)
    }

    /// Concrete labels addressed by `selectors` (base labels expanded).
    pub fn expand<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<Label>> {
        Ok(self
            .resolve(selectors)?
            .into_iter()
            .map(|axis| self.labels[axis].clone())
            .collect())
    }

    /// Mass of one cell, addressed by one bin index per axis.
    pub fn mass_at(&self, indices: &[usize]) -> Result<f64> {
        if indices.len() != self.rank() {
            return Err(Error::LengthMismatch {
                what: "cell indices",
                expected: self.rank(),
                got: indices.len(),
            });
        }
        for (axis, &index) in indices.iter().enumerate() {
            self.check_index(axis, index)?;
        }
        Ok(self.mass[IxDyn(indices)])
    }

    /// One-dimensional marginal of `axis`.
    pub fn marginal(&self, axis: usize) -> Result<Array1<f64>> {
        let reduced = self.keep_axes(&[axis]);
        Ok(reduced.mass.into_dimensionality::<Ix1>()?)
    }

    /// Two-dimensional marginal over `(first, second)`, rows indexed by
    /// `first`. The axes must differ.
    pub fn pair_marginal(&self, first: usize, second: usize) -> Result<Array2<f64>> {
        if first == second {
            return Err(Error::DuplicateLabel(self.labels[first].to_string()));
        }
        let reduced = self.keep_axes(&[first, second]).mass;
        let pair = reduced.into_dimensionality::<Ix2>()?;
        Ok(if first < second {
            pair
        } else {
            pair.reversed_axes()
        })
    }

    fn check_index(&self, axis: usize, index: usize) -> Result<()> {
        let size = self.mass.shape()[axis];
        if index >= size {
            return Err(Error::IndexOutOfRange {
                label: self.labels[axis].to_string(),
                index,
                size,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bin slicing
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Keep only the listed bins along each named axis.
    ///
    /// `indices[i]` applies to every axis `labels[i]` expands to. Axes not
    /// named keep all their bins. The result is not renormalized.
    pub fn filter_to<S, I>(&self, labels: &[S], indices: &[I]) -> Result<Self>
    where
        S: AsRef<str>,
        I: AsRef<[usize]>,
    {
        let picks = self.pair_selectors(labels, indices)?;
        self.filter_axes(&picks)
    }

    /// Delete the listed bins along each named axis. The result is not
    /// renormalized.
    pub fn remove_values<S, I>(&self, labels: &[S], indices: &[I]) -> Result<Self>
    where
        S: AsRef<str>,
        I: AsRef<[usize]>,
    {
        let removals = self.pair_selectors(labels, indices)?;
        let mut picks = Vec::with_capacity(removals.len());
        for (axis, removed) in removals {
            for &index in &removed {
                self.check_index(axis, index)?;
            }
            let kept: Vec<usize> = (0..self.mass.shape()[axis])
                .filter(|i| !removed.contains(i))
                .collect();
            if kept.is_empty() {
                return Err(Error::EmptyAxis(self.labels[axis].to_string()));
            }
            picks.push((axis, kept));
        }
        self.filter_axes(&picks)
    }

    /// Keep the listed bins along each named axis and drop every other axis.
    ///
    /// This extracts the sub-mass of one combination of outcomes. Dropped
    /// axes of size 1 are squeezed; larger ones are summed out. The result
    /// is not normalized.
    pub fn shrink_values_to<S, I>(&self, labels: &[S], indices: &[I]) -> Result<Self>
    where
        S: AsRef<str>,
        I: AsRef<[usize]>,
    {
        let picks = self.pair_selectors(labels, indices)?;
        let filtered = self.filter_axes(&picks)?;
        let kept: Vec<usize> = picks.iter().map(|(axis, _)| *axis).collect();
        let mut out = filtered.keep_axes(&kept);
        out.normalized = false;
        Ok(out)
    }

    /// Expand each selector and attach its index list to every axis it
    /// addresses.
    fn pair_selectors<S, I>(&self, labels: &[S], indices: &[I]) -> Result<Vec<(usize, Vec<usize>)>>
    where
        S: AsRef<str>,
        I: AsRef<[usize]>,
    {
        if labels.is_empty() {
            return Err(Error::NoLabels);
        }
        if labels.len() != indices.len() {
            return Err(Error::LengthMismatch {
                what: "index lists per label",
                expected: labels.len(),
                got: indices.len(),
            });
        }
        let mut pairs = Vec::new();
        for (selector, list) in labels.iter().zip(indices) {
            for axis in self.resolve(std::slice::from_ref(selector))? {
                pairs.push((axis, list.as_ref().to_vec()));
            }
        }
        Ok(pairs)
    }

    fn filter_axes(&self, picks: &[(usize, Vec<usize>)]) -> Result<Self> {
        let mut mass = self.mass.clone();
        for (axis, list) in picks {
            if list.is_empty() {
                return Err(Error::EmptyAxis(self.labels[*axis].to_string()));
            }
            let size = mass.shape()[*axis];
            if let Some(&index) = list.iter().find(|&&i| i >= size) {
                return Err(Error::IndexOutOfRange {
                    label: self.labels[*axis].to_string(),
                    index,
                    size,
                });
            }
            mass = mass.select(Axis(*axis), list);
        }
        Ok(Self::derived(self.labels.clone(), mass, false))
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Sum over the named axes and remove them.
    ///
    /// Fails when no label is given or when every axis would be removed.
    pub fn marginalize_out<S: AsRef<str>>(&self, labels: &[S]) -> Result<Self> {
        let axes = self.resolve(labels)?;
        if axes.len() >= self.rank() {
            return Err(Error::AllAxesRemoved);
        }
        Ok(self.sum_out_axes(&axes))
    }

    /// Keep only the named axes (in tensor order) and sum over the rest.
    pub fn shrink_to<S: AsRef<str>>(&self, labels: &[S]) -> Result<Self> {
        let axes = self.resolve(labels)?;
        Ok(self.keep_axes(&axes))
    }

    /// Divide the mass by the marginal of the condition axes.
    ///
    /// The result holds P(rest | cond) for every cell, with the condition
    /// axes kept so every conditional slice stays addressable. Cells whose
    /// condition marginal is zero hold 0. The result is not a joint
    /// distribution and is flagged unnormalized.
    pub fn condition_on<S: AsRef<str>>(&self, condition: &[S]) -> Result<Self> {
        let cond_axes = self.resolve(condition)?;
        if cond_axes.len() >= self.rank() {
            return Err(Error::ConditionCoversAll);
        }
        let mut marginal = self.keep_axes(&cond_axes).mass;
        for axis in 0..self.rank() {
            if !cond_axes.contains(&axis) {
                marginal.insert_axis_inplace(Axis(axis));
            }
        }
        let denominator = marginal
            .broadcast(self.mass.raw_dim())
            .ok_or_else(|| Error::Shape("condition marginal does not broadcast".to_string()))?;
        let conditional = Zip::from(&self.mass)
            .and(&denominator)
            .map_collect(|&joint, &cond| zero_non_finite(joint / cond));
        Ok(Self::derived(self.labels.clone(), conditional, false))
    }

    fn keep_axes(&self, kept: &[usize]) -> Self {
        let dropped: Vec<usize> = (0..self.rank()).filter(|a| !kept.contains(a)).collect();
        self.sum_out_axes(&dropped)
    }

    fn sum_out_axes(&self, axes: &[usize]) -> Self {
        let mut sorted = axes.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        let mut mass = self.mass.clone();
        for &axis in &sorted {
            mass = mass.sum_axis(Axis(axis));
        }
        let labels = self
            .labels
            .iter()
            .enumerate()
            .filter(|(axis, _)| !sorted.contains(axis))
            .map(|(_, l)| l.clone())
            .collect();
        Self::derived(labels, mass, self.normalized)
    }
}

// ---------------------------------------------------------------------------
// In-place operations
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Divide every cell by the total mass. Fails, leaving the tensor
    /// untouched, when the total is zero.
    pub fn normalize(&mut self) -> Result<()> {
        let total = self.mass.sum();
        if total == 0.0 {
            return Err(Error::ZeroMass);
        }
        self.mass.mapv_inplace(|v| v / total);
        self.normalized = true;
        Ok(())
    }

    /// Permute axes so the named labels come first, in the given order.
    ///
    /// Axes not named keep their relative order behind them. Unknown labels
    /// fail before anything moves.
    pub fn reorder_to<S: AsRef<str>>(&mut self, order: &[S]) -> Result<()> {
        let mut permutation = self.resolve(order)?;
        let rest: Vec<usize> = (0..self.rank())
            .filter(|a| !permutation.contains(a))
            .collect();
        permutation.extend(rest);
        if permutation.iter().enumerate().all(|(i, &a)| i == a) {
            return Ok(());
        }
        let permuted = self
            .mass
            .view()
            .permuted_axes(IxDyn(&permutation))
            .as_standard_layout()
            .into_owned();
        self.labels = permutation.iter().map(|&a| self.labels[a].clone()).collect();
        self.mass = permuted;
        Ok(())
    }

    /// Fill the tensor with uniformly random mass and normalize it.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        // 1 - U[0, 1) lies in (0, 1], so the total is strictly positive.
        self.mass.mapv_inplace(|_| 1.0 - rng.random::<f64>());
        let total = self.mass.sum();
        self.mass.mapv_inplace(|v| v / total);
        self.normalized = true;
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Randomly sub-sample the bins of each named axis and renormalize.
    ///
    /// Every addressed axis independently keeps `ceil(fraction * size)`
    /// distinct bins drawn uniformly without replacement. With `sorted` the
    /// kept bins stay in ascending order, which time axes need.
    pub fn sample_values<S, R>(
        &self,
        labels: &[S],
        fractions: &[f64],
        sorted: bool,
        rng: &mut R,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if labels.is_empty() {
            return Err(Error::NoLabels);
        }
        if labels.len() != fractions.len() {
            return Err(Error::LengthMismatch {
                what: "fractions per label",
                expected: labels.len(),
                got: fractions.len(),
            });
        }
        let mut picks = Vec::new();
        for (selector, &fraction) in labels.iter().zip(fractions) {
            check_fraction(fraction)?;
            for axis in self.resolve(std::slice::from_ref(selector))? {
                let size = self.mass.shape()[axis];
                let amount = sample_size(size, fraction);
                let mut chosen = index::sample(rng, size, amount).into_vec();
                if sorted {
                    chosen.sort_unstable();
                }
                log::trace!(
                    "sampled {amount}/{size} bins of '{}'",
                    self.labels[axis]
                );
                picks.push((axis, chosen));
            }
        }
        let mut sampled = self.filter_axes(&picks)?;
        sampled.normalize()?;
        Ok(sampled)
    }

    /// Randomly keep a fraction of the addressed variables and marginalize
    /// out the others.
    ///
    /// A fraction of 1, or a draw that removes nothing, returns `self`
    /// borrowed rather than a copy.
    pub fn sample_variables<S, R>(
        &self,
        labels: &[S],
        fraction: f64,
        rng: &mut R,
    ) -> Result<Cow<'_, Self>>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if labels.is_empty() {
            return Err(Error::NoLabels);
        }
        check_fraction(fraction)?;
        let mut axes = self.resolve(labels)?;
        if fraction == 1.0 {
            return Ok(Cow::Borrowed(self));
        }
        axes.shuffle(rng);
        let keep = sample_size(axes.len(), fraction);
        let removed = &axes[keep..];
        if removed.is_empty() {
            return Ok(Cow::Borrowed(self));
        }
        log::trace!("sampled {keep}/{} variables", axes.len());
        Ok(Cow::Owned(self.sum_out_axes(removed)))
    }
}

/// Number of items kept when sampling `fraction` of `size`, at least one.
pub(crate) fn sample_size(size: usize, fraction: f64) -> usize {
    ((fraction * size as f64).ceil() as usize).clamp(1, size.max(1))
}

// ---------------------------------------------------------------------------
// Reshaping
// ---------------------------------------------------------------------------

impl ProbabilityTensor {
    /// Collapse several axes into a single composite axis.
    ///
    /// Bin `k` of the new axis enumerates the Cartesian product of the joined
    /// bins in row-major order, the first joined label being the most
    /// significant. The new axis takes the position of the first joined
    /// label; the joined labels disappear.
    pub fn join_dimensions<S, L>(&self, labels: &[S], new_label: L) -> Result<Self>
    where
        S: AsRef<str>,
        L: Into<Label>,
    {
        let joined = self.resolve(labels)?;
        let Some(&first) = joined.first() else {
            return Err(Error::NoLabels);
        };
        let new_label = new_label.into();
        let others: Vec<usize> = (0..self.rank()).filter(|a| !joined.contains(a)).collect();
        if others.iter().any(|&a| self.labels[a] == new_label) {
            return Err(Error::DuplicateLabel(new_label.to_string()));
        }
        let insert_at = others.iter().filter(|&&a| a < first).count();

        let mut permutation = others[..insert_at].to_vec();
        permutation.extend_from_slice(&joined);
        permutation.extend_from_slice(&others[insert_at..]);

        let shape = self.mass.shape();
        let mut new_shape: Vec<usize> = others[..insert_at].iter().map(|&a| shape[a]).collect();
        new_shape.push(joined.iter().map(|&a| shape[a]).product());
        new_shape.extend(others[insert_at..].iter().map(|&a| shape[a]));

        let mut new_labels: Vec<Label> = others[..insert_at]
            .iter()
            .map(|&a| self.labels[a].clone())
            .collect();
        new_labels.push(new_label);
        new_labels.extend(others[insert_at..].iter().map(|&a| self.labels[a].clone()));

        let values: Vec<f64> = self
            .mass
            .view()
            .permuted_axes(IxDyn(&permutation))
            .iter()
            .copied()
            .collect();
        let mass = ArrayD::from_shape_vec(IxDyn(&new_shape), values)?;
        Ok(Self::derived(new_labels, mass, self.normalized))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn correlated() -> ProbabilityTensor {
        ProbabilityTensor::new(arr2(&[[0.5, 0.0], [0.0, 0.5]]).into_dyn(), ["A", "B"], true)
            .unwrap()
    }

    /// 2x3x4 tensor over (t, X_1, X_2) with distinct positive cells.
    fn cube() -> ProbabilityTensor {
        let values: Vec<f64> = (1..=24).map(|v| v as f64).collect();
        let total: f64 = values.iter().sum();
        let values = values.into_iter().map(|v| v / total).collect();
        ProbabilityTensor::from_shape_vec(&[2, 3, 4], values, ["t", "X_1", "X_2"], true).unwrap()
    }

    #[test]
    fn test_new_validates_layout() {
        let mass = arr2(&[[0.25, 0.25], [0.25, 0.25]]).into_dyn();
        assert_eq!(
            ProbabilityTensor::new(mass.clone(), ["A"], true),
            Err(Error::RankMismatch { rank: 2, labels: 1 })
        );
        assert_eq!(
            ProbabilityTensor::new(mass, ["A", "A"], true),
            Err(Error::DuplicateLabel("A".to_string()))
        );
        let empty = ArrayD::<f64>::zeros(IxDyn(&[0]));
        assert_eq!(ProbabilityTensor::new(empty, ["A"], false), Err(Error::Empty));
    }

    #[test]
    fn test_new_rejects_out_of_range_and_unnormalized() {
        let bad = arr1(&[0.5, 1.5]).into_dyn();
        assert!(matches!(
            ProbabilityTensor::new(bad, ["A"], false),
            Err(Error::MassOutOfRange { index: 1, .. })
        ));
        let nan = arr1(&[0.5, f64::NAN]).into_dyn();
        assert!(ProbabilityTensor::new(nan, ["A"], false).is_err());
        let half = arr1(&[0.25, 0.25]).into_dyn();
        assert!(matches!(
            ProbabilityTensor::new(half.clone(), ["A"], true),
            Err(Error::NotNormalized { .. })
        ));
        assert!(ProbabilityTensor::new(half, ["A"], false).is_ok());
    }

    #[test]
    fn test_from_counts_normalizes() {
        let counts = arr2(&[[2.0, 6.0], [0.0, 2.0]]).into_dyn();
        let t = ProbabilityTensor::from_counts(counts, ["A", "B"]).unwrap();
        assert!(t.is_normalized());
        assert!((t.mass_at(&[0, 1]).unwrap() - 0.6).abs() < 1e-12);
        let zeros = ArrayD::<f64>::zeros(IxDyn(&[3]));
        assert_eq!(ProbabilityTensor::from_counts(zeros, ["A"]), Err(Error::ZeroMass));
        let negative = arr1(&[1.0, -1.0]).into_dyn();
        assert!(matches!(
            ProbabilityTensor::from_counts(negative, ["A"]),
            Err(Error::InvalidCount { index: 1, .. })
        ));
    }

    #[test]
    fn test_accessors() {
        let t = cube();
        assert_eq!(t.rank(), 3);
        assert_eq!(t.shape(), &[2, 3, 4]);
        assert_eq!(t.label_size("X_2").unwrap(), 4);
        assert!(t.has_label("X_1"));
        assert!(!t.has_label("X"));
        assert_eq!(t.expand(&["X"]).unwrap().len(), 2);
        assert!(matches!(
            t.mass_at(&[0, 3, 0]),
            Err(Error::IndexOutOfRange { index: 3, size: 3, .. })
        ));
    }

    #[test]
    fn test_filter_to_keeps_selection_unnormalized() {
        let t = cube();
        let f = t.filter_to(&["X_2"], &[vec![3, 0]]).unwrap();
        assert_eq!(f.shape(), &[2, 3, 2]);
        assert!(!f.is_normalized());
        assert_eq!(f.mass_at(&[1, 2, 0]).unwrap(), t.mass_at(&[1, 2, 3]).unwrap());
        assert_eq!(f.mass_at(&[0, 1, 1]).unwrap(), t.mass_at(&[0, 1, 0]).unwrap());
    }

    #[test]
    fn test_filter_to_applies_indices_to_whole_group() {
        let t = cube();
        let f = t.filter_to(&["X"], &[vec![0]]).unwrap();
        assert_eq!(f.shape(), &[2, 1, 1]);
    }

    #[test]
    fn test_filter_to_contract_violations() {
        let t = cube();
        assert!(matches!(
            t.filter_to(&["t", "X_1"], &[vec![0]]),
            Err(Error::LengthMismatch { .. })
        ));
        assert_eq!(
            t.filter_to(&["Z"], &[vec![0]]),
            Err(Error::UnknownLabel("Z".to_string()))
        );
        assert!(matches!(
            t.filter_to(&["t"], &[vec![2]]),
            Err(Error::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn test_marginalize_out_keeps_normalization() {
        let t = cube();
        for removed in [vec!["t"], vec!["X_1"], vec!["t", "X_2"], vec!["X"]] {
            let m = t.marginalize_out(&removed[..]).unwrap();
            assert!(m.is_normalized());
            assert!((m.total_mass() - 1.0).abs() < 1e-12);
        }
        assert_eq!(t.marginalize_out(&["t", "X"]), Err(Error::AllAxesRemoved));
        let none: [&str; 0] = [];
        assert_eq!(t.marginalize_out(&none), Err(Error::NoLabels));
    }

    #[test]
    fn test_shrink_to_matches_marginalize_complement_bitwise() {
        let t = cube();
        let kept = t.shrink_to(&["X_2", "t"]).unwrap();
        let removed = t.marginalize_out(&["X_1"]).unwrap();
        assert_eq!(kept.mass(), removed.mass());
        // Tensor order is kept regardless of selector order.
        assert_eq!(kept.label_names(), vec!["t", "X_2"]);
    }

    #[test]
    fn test_remove_values() {
        let t = cube();
        let r = t.remove_values(&["X_2"], &[vec![1, 2]]).unwrap();
        assert_eq!(r.shape(), &[2, 3, 2]);
        assert!(!r.is_normalized());
        assert_eq!(r.mass_at(&[0, 0, 1]).unwrap(), t.mass_at(&[0, 0, 3]).unwrap());
        assert_eq!(
            t.remove_values(&["t"], &[vec![0, 1]]),
            Err(Error::EmptyAxis("t".to_string()))
        );
    }

    #[test]
    fn test_shrink_values_to_extracts_outcome_mass() {
        let t = cube();
        let s = t.shrink_values_to(&["X_1"], &[vec![2]]).unwrap();
        assert_eq!(s.label_names(), vec!["X_1"]);
        assert_eq!(s.shape(), &[1]);
        let expected = t.marginal(1).unwrap()[2];
        assert!((s.mass_at(&[0]).unwrap() - expected).abs() < 1e-12);
        assert!(!s.is_normalized());
    }

    #[test]
    fn test_condition_on() {
        let t = ProbabilityTensor::new(
            arr2(&[[0.1, 0.3], [0.2, 0.4]]).into_dyn(),
            ["A", "B"],
            true,
        )
        .unwrap();
        let c = t.condition_on(&["A"]).unwrap();
        assert!(!c.is_normalized());
        assert!((c.mass_at(&[0, 0]).unwrap() - 0.25).abs() < 1e-12);
        assert!((c.mass_at(&[1, 1]).unwrap() - 4.0 / 6.0).abs() < 1e-12);
        // Conditioning on B broadcasts along the other axis.
        let c = t.condition_on(&["B"]).unwrap();
        assert!((c.mass_at(&[1, 0]).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(t.condition_on(&["A", "B"]), Err(Error::ConditionCoversAll));
    }

    #[test]
    fn test_condition_on_zero_marginal_gives_zero() {
        let t = ProbabilityTensor::new(
            arr2(&[[0.5, 0.5], [0.0, 0.0]]).into_dyn(),
            ["A", "B"],
            true,
        )
        .unwrap();
        let c = t.condition_on(&["A"]).unwrap();
        assert_eq!(c.mass_at(&[1, 0]).unwrap(), 0.0);
        assert_eq!(c.mass_at(&[1, 1]).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_in_place() {
        let mut t = cube().filter_to(&["t"], &[vec![1]]).unwrap();
        assert!(!t.is_normalized());
        t.normalize().unwrap();
        assert!(t.is_normalized());
        assert!((t.total_mass() - 1.0).abs() < 1e-12);

        let mut zero = ProbabilityTensor::new(arr1(&[0.0, 0.0]).into_dyn(), ["A"], false).unwrap();
        assert_eq!(zero.normalize(), Err(Error::ZeroMass));
        assert!(!zero.is_normalized());
    }

    #[test]
    fn test_reorder_to() {
        let mut t = cube();
        let before = t.mass_at(&[1, 2, 3]).unwrap();
        t.reorder_to(&["X_2"]).unwrap();
        assert_eq!(t.label_names(), vec!["X_2", "t", "X_1"]);
        assert_eq!(t.shape(), &[4, 2, 3]);
        assert_eq!(t.mass_at(&[3, 1, 2]).unwrap(), before);

        let snapshot = t.clone();
        assert!(t.reorder_to(&["X_1", "nope"]).is_err());
        assert_eq!(t, snapshot);
    }

    #[test]
    fn test_randomize_is_normalized() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = cube();
        t.randomize(&mut rng);
        assert!(t.is_normalized());
        assert!((t.total_mass() - 1.0).abs() < 1e-9);
        assert!(t.mass().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_sample_values_sizes_and_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let t = cube();
        let s = t.sample_values(&["X_2", "X_1"], &[0.5, 0.4], true, &mut rng).unwrap();
        // ceil(0.5 * 4) = 2, ceil(0.4 * 3) = 2
        assert_eq!(s.shape(), &[2, 2, 2]);
        assert!(s.is_normalized());
        assert!((s.total_mass() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_values_sorted_preserves_monotonic_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let values: Vec<f64> = (0..10).map(|v| (v + 1) as f64 / 55.0).collect();
        let t = ProbabilityTensor::from_shape_vec(&[10], values, ["time"], true).unwrap();
        let s = t.sample_values(&["time"], &[0.6], true, &mut rng).unwrap();
        let kept: Vec<f64> = s.mass().iter().copied().collect();
        assert_eq!(kept.len(), 6);
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_values_is_reproducible_with_seed() {
        let t = cube();
        let a = t
            .sample_values(&["X"], &[0.5], false, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let b = t
            .sample_values(&["X"], &[0.5], false, &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_values_rejects_bad_fraction() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            cube().sample_values(&["t"], &[0.0], false, &mut rng),
            Err(Error::InvalidFraction(0.0))
        );
    }

    #[test]
    fn test_sample_variables_full_fraction_borrows() {
        let mut rng = StdRng::seed_from_u64(1);
        let t = cube();
        let s = t.sample_variables(&["X"], 1.0, &mut rng).unwrap();
        assert!(matches!(s, Cow::Borrowed(_)));
        assert!(std::ptr::eq(s.as_ref(), &t));
    }

    #[test]
    fn test_sample_variables_drops_variables() {
        let mut rng = StdRng::seed_from_u64(5);
        let t = cube();
        let s = t.sample_variables(&["X"], 0.5, &mut rng).unwrap();
        assert!(matches!(s, Cow::Owned(_)));
        assert_eq!(s.rank(), 2);
        assert!(s.has_label("t"));
        assert!(s.is_normalized());
    }

    #[test]
    fn test_join_dimensions_enumerates_product() {
        let t = cube();
        let j = t.join_dimensions(&["X_1", "X_2"], "X").unwrap();
        assert_eq!(j.label_names(), vec!["t", "X"]);
        assert_eq!(j.shape(), &[2, 12]);
        assert!(j.is_normalized());
        // Row-major: X_1 most significant.
        assert_eq!(j.mass_at(&[1, 2 * 4 + 3]).unwrap(), t.mass_at(&[1, 2, 3]).unwrap());
    }

    #[test]
    fn test_join_dimensions_non_adjacent() {
        let t = cube();
        let j = t.join_dimensions(&["X_2", "t"], "pair").unwrap();
        // The composite lands where the first joined label (X_2) sat among
        // the remaining axes.
        assert_eq!(j.label_names(), vec!["X_1", "pair"]);
        assert_eq!(j.shape(), &[3, 8]);
        assert_eq!(j.mass_at(&[2, 3 * 2 + 1]).unwrap(), t.mass_at(&[1, 2, 3]).unwrap());
    }

    #[test]
    fn test_join_then_shrink_is_joint_marginal() {
        let t = cube();
        let j = t.join_dimensions(&["t", "X_1"], "tx").unwrap();
        let joint = j.shrink_to(&["tx"]).unwrap();
        let expected = t.shrink_to(&["t", "X_1"]).unwrap();
        assert_eq!(joint.shape(), &[6]);
        for (a, b) in joint.mass().iter().zip(expected.mass().iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_join_rejects_colliding_label() {
        assert_eq!(
            cube().join_dimensions(&["X_1"], "t"),
            Err(Error::DuplicateLabel("t".to_string()))
        );
    }

    #[test]
    fn test_pair_marginal_orientation() {
        let t = correlated();
        let ab = t.pair_marginal(0, 1).unwrap();
        let ba = t.pair_marginal(1, 0).unwrap();
        assert_eq!(ab, ba.t());
        assert!(t.pair_marginal(0, 0).is_err());
    }
}

// Ichimoku cloud lines
use super::shift_forward;
use shared::models::Bar;

pub struct Ichimoku {
    conversion: usize,
    base: usize,
    span_b: usize,
    displacement: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuOutput {
    pub conversion: Vec<Option<f64>>,
    pub base: Vec<Option<f64>>,
    /// Leading spans, already displaced forward.
    pub span_a: Vec<Option<f64>>,
    pub span_b: Vec<Option<f64>>,
}

impl Ichimoku {
    pub fn new(conversion: usize, base: usize, span_b: usize, displacement: usize) -> Self {
        Self { conversion, base, span_b, displacement }
    }

    pub fn compute(&self, data: &[Bar]) -> IchimokuOutput {
        let conversion = midpoint(data, self.conversion);
        let base = midpoint(data, self.base);
        let span_a: Vec<Option<f64>> = conversion
            .iter()
            .zip(&base)
            .map(|(c, b)| match (c, b) {
                (Some(c), Some(b)) => Some((c + b) / 2.0),
                _ => None,
            })
            .collect();
        let span_b = midpoint(data, self.span_b);

        IchimokuOutput {
            span_a: shift_forward(&span_a, self.displacement),
            span_b: shift_forward(&span_b, self.displacement),
            conversion,
            base,
        }
    }
}

/// (highest high + lowest low) / 2 over the trailing window.
fn midpoint(data: &[Bar], window: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; data.len()];
    if window == 0 {
        return results;
    }
    for i in window.saturating_sub(1)..data.len() {
        let slice = &data[i + 1 - window..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        results[i] = Some((highest + lowest) / 2.0);
    }
    results
}

use crate::delegate::DelegateGraph;
use crate::layering::Layering;
use std::hash::Hash;

/// Packs each layer left to right with `gap` between boxes and centres it on the widest layer.
pub fn position_x<V, E>(g: &DelegateGraph<V, E>, layering: &Layering, gap: f64) -> Vec<f64>
where
    V: Clone + Eq + Hash,
{
    let layer_width = |layer: &[usize]| {
        let boxes: f64 = layer.iter().map(|&v| g.vertex(v).size.width).sum();
        boxes + gap * layer.len().saturating_sub(1) as f64
    };
    let widest = layering
        .layers()
        .iter()
        .map(|l| layer_width(l))
        .fold(0.0, f64::max);

    let mut xs = vec![0.0; g.vertex_count()];
    for layer in layering.layers() {
        let mut cursor = (widest - layer_width(layer)) / 2.0;
        for &v in layer {
            let width = g.vertex(v).size.width;
            xs[v] = cursor + width / 2.0;
            cursor += width + gap;
        }
    }
    xs
}

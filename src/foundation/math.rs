/// Clamp `value` into `[min, max]` and snap it to the nearest multiple of `step` from `min`.
pub(crate) fn quantize(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let clamped = if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    };
    if step <= 0.0 {
        return clamped;
    }
    let steps = ((clamped - min) / step).round();
    // Re-derive from the step count so repeated calls are stable (0.1 * 7 != 0.7 otherwise).
    let snapped = min + steps * step;
    let snapped = (snapped * 1e9).round() / 1e9;
    snapped.clamp(min, max)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Blend a straight-alpha colour channel over an opaque background channel.
pub(crate) fn blend_over_opaque(src: u8, alpha: u8, bg: u8) -> u8 {
    if alpha == 255 {
        return src;
    }
    let a = u16::from(alpha);
    (mul_div255_u16(u16::from(src), a) + mul_div255_u16(u16::from(bg), 255 - a)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

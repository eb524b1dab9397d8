/// Nearest-neighbour stretch of a `src_w x src_h` buffer over a `dst_w x dst_h` one.
///
/// Both buffers are row-major. Empty sizes are a no-op.
pub fn stretch(src: &[u32], src_w: u32, src_h: u32, dst: &mut [u32], dst_w: u32, dst_h: u32) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return;
    }

    let (sw, sh) = (src_w as usize, src_h as usize);
    let (dw, dh) = (dst_w as usize, dst_h as usize);
    if src.len() < sw * sh || dst.len() < dw * dh {
        log::warn!(
            "blit: buffer too small (src {} for {sw}x{sh}, dst {} for {dw}x{dh})",
            src.len(),
            dst.len()
        );
        return;
    }

    let columns: Vec<usize> = (0..dw).map(|dx| dx * sw / dw).collect();

    for (dy, dst_row) in dst.chunks_exact_mut(dw).take(dh).enumerate() {
        let sy = dy * sh / dh;
        let src_row = &src[sy * sw..(sy + 1) * sw];
        for (out, &sx) in dst_row.iter_mut().zip(&columns) {
            *out = src_row[sx];
        }
    }
}

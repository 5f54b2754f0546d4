use core::arch::aarch64::*;

pub unsafe fn eq_mask_8x32(block: &[i32; 8], target: i32) -> u8 {
    unsafe {
        let needle = vdupq_n_s32(target);
        let lo = vceqq_s32(vld1q_s32(block.as_ptr()), needle);
        let hi = vceqq_s32(vld1q_s32(block.as_ptr().add(4)), needle);

        // movemask: keep one weighted bit per lane, then sum across lanes
        let lo_bits = vandq_u32(lo, vld1q_u32([1u32, 2, 4, 8].as_ptr()));
        let hi_bits = vandq_u32(hi, vld1q_u32([16u32, 32, 64, 128].as_ptr()));

        vaddvq_u32(vorrq_u32(lo_bits, hi_bits)) as u8
    }
}

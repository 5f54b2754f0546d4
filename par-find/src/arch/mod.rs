cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        mod x86_64;
        pub use x86_64::*;
    } else if #[cfg(all(target_feature = "neon", target_arch = "aarch64"))] {
        mod neon;
        pub use neon::*;
    } else {
        #[inline(always)]
        pub unsafe fn eq_mask_8x32(block: &[i32; 8], target: i32) -> u8 {
            let mut mask = 0u8;
            for (lane, &value) in block.iter().enumerate() {
                if value == target {
                    mask |= 1 << lane;
                }
            }
            mask
        }
    }
}

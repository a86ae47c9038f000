// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lock-step advance of a loop counter and three lane pointers with a single
//! vector addition.
//!
//! The loop state is a record of four machine words, overlaid with a vector of
//! four `u64` lanes. Adding a precomputed increment vector to the overlay moves
//! the counter forward by one lane width and each pointer forward by one
//! [`Lane`], in one operation.

use super::{Lane, LANES};
use crate::workload::Workload;

#[cfg(target_pointer_width = "64")]
pub use literal::{increment, simd_ptr_inc_simd};

#[cfg(target_pointer_width = "64")]
mod literal {
    use super::*;
    use std::mem::{offset_of, size_of};
    use wide::u64x4;

    /// Loop state. The pointers are kept as addresses, rebuilt into pointers at
    /// each access with `as` casts, which take the provenance exposed when the
    /// addresses were taken.
    #[repr(C)]
    #[derive(Clone, Copy)]
    struct Cursor {
        counter: u64,
        left: u64,
        right: u64,
        output: u64,
    }

    #[repr(C)]
    union Overlay {
        cursor: Cursor,
        vector: u64x4,
    }

    const _: () = assert!(size_of::<Cursor>() == size_of::<u64x4>());

    /// Increment of the overlay for one step: [`LANES`] in the counter slot and
    /// the size of a [`Lane`] in each address slot. Slots are located with the
    /// field offsets of the cursor.
    pub fn increment() -> u64x4 {
        const SLOT: usize = size_of::<u64>();
        let mut slots = [0u64; 4];
        slots[offset_of!(Cursor, counter) / SLOT] = LANES as u64;
        for offset in [
            offset_of!(Cursor, left),
            offset_of!(Cursor, right),
            offset_of!(Cursor, output),
        ] {
            slots[offset / SLOT] = size_of::<Lane>() as u64;
        }
        u64x4::from(slots)
    }

    /// Vector multiplication over pinned lane pointers, where the counter and
    /// the three pointers are advanced by one vector addition on an overlay.
    pub fn simd_ptr_inc_simd(workload: &mut Workload) {
        let mut pinned = workload.pin();
        let (left, right, output) = pinned.lanes();
        let body = (pinned.whole_lanes() * LANES) as u64;

        let mut overlay = Overlay {
            cursor: Cursor {
                counter: 0,
                left: left as usize as u64,
                right: right as usize as u64,
                output: output as usize as u64,
            },
        };
        let step = increment();

        loop {
            // SAFETY: Both fields of the overlay are plain integers, so any bit
            // pattern written through one is a valid value of the other.
            let cursor = unsafe { overlay.cursor };
            if cursor.counter >= body {
                break;
            }
            // SAFETY:
            // - After `counter / LANES` steps each address moved by as many lanes,
            //   which is less than `whole_lanes()`, so it points to a whole lane inside
            //   its pinned buffer.
            // - The addresses come from the pinned lane pointers, so they are aligned
            //   for `Lane` and their provenance was exposed by the casts above.
            // - The output doesn't overlap the inputs.
            unsafe {
                *(cursor.output as usize as *mut Lane) =
                    *(cursor.left as usize as *const Lane) * *(cursor.right as usize as *const Lane);
            }
            // SAFETY: See above.
            overlay.vector = unsafe { overlay.vector } + step;
        }

        pinned.finish_scalar(body as usize);
    }

}

/// Vector multiplication over pinned lane pointers, where a single loop index
/// is scaled into the byte offset shared by the three buffers.
#[cfg(not(target_pointer_width = "64"))]
pub fn simd_ptr_inc_simd(workload: &mut Workload) {
    use std::mem::size_of;

    let mut pinned = workload.pin();
    let (left, right, output) = pinned.lanes();
    let vectors = pinned.whole_lanes();

    for i in 0..vectors {
        let offset = i * size_of::<Lane>();
        // SAFETY:
        // - `i < whole_lanes()`, so the offset is a whole lane inside each buffer.
        // - The pinned lane pointers are aligned for `Lane`.
        // - The output doesn't overlap the inputs.
        unsafe {
            *output.byte_add(offset) = *left.byte_add(offset) * *right.byte_add(offset);
        }
    }
    pinned.finish_scalar(vectors * LANES);
}

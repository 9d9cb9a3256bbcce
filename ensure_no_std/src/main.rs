// ensure_no_std/src/main.rs
#![no_std]
#![no_main]

use core::panic::PanicInfo;
use cv_core::{CameraToWorld, Pose};
use cv_pinhole::CameraIntrinsics;

/// This function is called on panic.
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

#[no_mangle]
pub extern "C" fn _start() -> ! {
    let point = CameraIntrinsics::identity(640, 480).back_project(320, 240, 1.0);
    let _ = CameraToWorld::identity().transform(point);
    loop {}
}

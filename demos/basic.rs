use slaballoc::SlabAlloc;

fn log_alloc(allocator: &SlabAlloc, requested: usize, addr: *const u8) {
    println!(
        "Requested {requested} bytes, usable {} at {addr:?}",
        allocator.usable_size(addr)
    );
}

fn main() {
    let mut allocator = SlabAlloc::new();

    let small = allocator.allocate(24);
    log_alloc(&allocator, 24, small.as_ptr());

    let medium = allocator.allocate(100);
    log_alloc(&allocator, 100, medium.as_ptr());

    let large = allocator.allocate(5000);
    println!(
        "Requested 5000 bytes on the large path, at {:?}",
        large.as_ptr()
    );

    unsafe {
        allocator.deallocate(small.as_ptr());
    }

    let reused = allocator.allocate(24);
    if reused == small {
        println!("Freed block correctly reused at {:?}", reused.as_ptr());
    } else {
        println!(
            "Freed block not reused. Was at {:?}, got {:?}",
            small.as_ptr(),
            reused.as_ptr()
        );
    }

    unsafe {
        allocator.deallocate(medium.as_ptr());
        allocator.deallocate(reused.as_ptr());
    }
}

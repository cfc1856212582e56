//! This example is designed to test the implementation of the trait
//! `GlobalAlloc` on our allocator. See [`GlobalSlabAlloc`] for the actual
//! trait implementation and its single-threaded restriction.

use slaballoc::GlobalSlabAlloc;

#[global_allocator]
static ALLOCATOR: GlobalSlabAlloc = GlobalSlabAlloc::new();

fn main() {
    // Box example
    let val_box = Box::new(22);
    println!("Box Value: {}, At: {:p}", val_box, val_box);

    // Vec example
    let mut v = Vec::new();
    for i in 0..5 {
        v.push(i * 10);
        println!("Added {}; Capacity: {}; At: {:p}", v[i], v.capacity(), v.as_ptr());
    }

    // String example
    let msg = String::from("Heap Testing");
    println!("\nString '{}' - At: {:p}", msg, msg.as_ptr());

    let p1 = Box::new(2.22);
    let addr_p1 = format!("{:p}", p1);
    println!("P1 Allocated at: {}", addr_p1);

    drop(p1);
    println!("P1 Deallocated");

    let p2 = Box::new(2.22);
    let addr_p2 = format!("{:p}", p2);
    println!("P2 at: {}", addr_p2);

    // Reuse example: same size class, so the freed block comes right back
    let a = Box::new([0u8; 64]);
    let ptr_a = a.as_ptr();

    drop(a);

    let b = Box::new([0u8; 64]);
    let ptr_b = b.as_ptr();

    if ptr_a == ptr_b {
        println!("Correctly reused at {:p}", ptr_b);
    } else {
        println!(
            "Not correctly reused. A was at {:p} and B is at {:p}",
            ptr_a, ptr_b
        );
    }
}

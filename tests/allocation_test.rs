use colscan::access::TypedValue;
use colscan::expression::{row_matches, Expression};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

/// Counts heap allocations made by the current thread
struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn allocations_during(f: impl FnOnce()) -> usize {
    let before = ALLOCATIONS.with(Cell::get);
    f();
    ALLOCATIONS.with(Cell::get) - before
}

#[test]
fn test_string_equality_does_not_allocate() {
    let filter = Expression::eq(
        Expression::column(0),
        Expression::literal(TypedValue::string("a-fairly-long-literal")),
    );
    let hit = vec![TypedValue::string("a-fairly-long-literal")];
    let miss = vec![TypedValue::string("some-other-long-column-value")];

    let allocations = allocations_during(|| {
        for _ in 0..1000 {
            assert_eq!(row_matches(&filter, &hit), Ok(true));
            assert_eq!(row_matches(&filter, &miss), Ok(false));
        }
    });
    assert_eq!(allocations, 0);
}

#[test]
fn test_compound_filter_does_not_allocate() {
    // name = 'alice' AND (age > 18 OR score IN (1.5, 2.5)) AND note IS NOT NULL
    let filter = Expression::and(
        Expression::and(
            Expression::eq(
                Expression::column(0),
                Expression::literal(TypedValue::string("alice")),
            ),
            Expression::or(
                Expression::gt(
                    Expression::column(1),
                    Expression::literal(TypedValue::long(18)),
                ),
                Expression::in_list(
                    Expression::column(2),
                    vec![
                        Expression::literal(TypedValue::double(1.5)),
                        Expression::literal(TypedValue::double(2.5)),
                    ],
                ),
            ),
        ),
        Expression::is_not_null(Expression::column(3)),
    );
    let rows = [
        vec![
            TypedValue::string("alice"),
            TypedValue::int(12),
            TypedValue::double(2.5),
            TypedValue::binary(vec![1, 2, 3]),
        ],
        vec![
            TypedValue::string("alice"),
            TypedValue::int(40),
            TypedValue::double(0.0),
            TypedValue::null(),
        ],
        vec![
            TypedValue::string("bob"),
            TypedValue::int(40),
            TypedValue::null(),
            TypedValue::string("note"),
        ],
    ];

    let allocations = allocations_during(|| {
        for _ in 0..1000 {
            assert_eq!(row_matches(&filter, &rows[0]), Ok(true));
            assert_eq!(row_matches(&filter, &rows[1]), Ok(false));
            assert_eq!(row_matches(&filter, &rows[2]), Ok(false));
        }
    });
    assert_eq!(allocations, 0);
}

/// A conditional expression on one line.  Rust's `if` is already an
/// expression, but `cargo fmt` spreads it over five lines, and the
/// border rules for the Sobel window and the DP neighbours read much
/// better as a table of one-liners.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}

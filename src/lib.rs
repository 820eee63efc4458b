pub mod algorithms;
pub mod config;
pub mod types;
pub mod util;

/// Measures the wall-clock time of a code block and prints it with a tag.
///
/// Evaluates the block, prints `<TAG> Elapsed Time: <us> us` to stdout and
/// returns the block's value. Used by the benchmark driver to time each
/// round of a task.
#[macro_export]
macro_rules! measure_time {
    ($tag:expr, $body:block) => {{
        let start = std::time::Instant::now();
        let result = $body;
        let duration = start.elapsed();
        println!("{} Elapsed Time: {:?} us", $tag, duration.as_micros());
        result
    }};
}

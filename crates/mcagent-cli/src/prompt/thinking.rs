use rand::seq::SliceRandom;

const THINKING_MESSAGES: &[&str] = &[
    "Thinking",
    "Pondering",
    "Mulling it over",
    "Consulting the docs",
    "Rummaging through the files",
    "Brewing a reply",
    "Sharpening pencils",
    "Counting tokens",
    "Reading the fine print",
    "Connecting the dots",
    "Untangling the request",
    "Warming up",
];

/// A random message to show next to the spinner while the model works
pub fn get_random_thinking_message() -> &'static str {
    THINKING_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Thinking")
}

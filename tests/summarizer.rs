#[path = "summarizer/live_stack.rs"]
mod live_stack;

//! Console output object.
//!
//! All observable output of the simulation is a side effect of task
//! actions and synchronous calls writing through a [`Console`]. The
//! scheduler itself never prints. Tests swap the writer for a capture
//! buffer and assert on line order.

#![warn(missing_docs)]
#![warn(clippy::all)]

use core_types::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Console output writer trait
pub trait ConsoleWriter {
    /// Write a message to the console output
    fn write(&self, message: &str);
}

/// Default console writer that prints to stdout
struct StdoutWriter;

impl ConsoleWriter for StdoutWriter {
    fn write(&self, message: &str) {
        println!("{}", message);
    }
}

/// Writer that appends to a shared capture buffer
struct CaptureWriter {
    output: Rc<RefCell<Vec<String>>>,
}

impl ConsoleWriter for CaptureWriter {
    fn write(&self, message: &str) {
        self.output.borrow_mut().push(message.to_string());
    }
}

/// Console object
pub struct Console {
    output: Rc<RefCell<Vec<String>>>,
    writer: Box<dyn ConsoleWriter>,
}

impl Console {
    /// Create a new console with default stdout output
    pub fn new() -> Self {
        Console {
            output: Rc::new(RefCell::new(Vec::new())),
            writer: Box::new(StdoutWriter),
        }
    }

    /// Create a console with custom output capture
    pub fn new_with_output(output: Rc<RefCell<Vec<String>>>) -> Self {
        let captured_output = output.clone();
        Console {
            output,
            writer: Box::new(CaptureWriter {
                output: captured_output,
            }),
        }
    }

    /// Format values for output
    fn format_values(values: &[Value]) -> String {
        values
            .iter()
            .map(|v| v.to_display_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// console.log(...values)
    pub fn log(&self, values: &[Value]) {
        let message = Self::format_values(values);
        self.writer.write(&message);
    }

    /// console.error(...values)
    pub fn error(&self, values: &[Value]) {
        let message = format!("Error: {}", Self::format_values(values));
        self.writer.write(&message);
    }

    /// console.warn(...values)
    pub fn warn(&self, values: &[Value]) {
        let message = format!("Warning: {}", Self::format_values(values));
        self.writer.write(&message);
    }

    /// console.info(...values)
    pub fn info(&self, values: &[Value]) {
        let message = format!("Info: {}", Self::format_values(values));
        self.writer.write(&message);
    }

    /// Returns the lines written so far, in output order.
    ///
    /// With the default stdout writer this is empty; only the capture
    /// writer feeds the buffer.
    pub fn lines(&self) -> Vec<String> {
        self.output.borrow().clone()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

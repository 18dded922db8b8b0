// Create the Error, ErrorKind, ResultExt, and Result types for the library.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    errors {
        OutOfBounds(x: isize, y: isize) {
            description("grid coordinate out of bounds")
            display("coordinate ({}, {}) is outside the grid", x, y)
        }
        InvalidDimensions(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("cannot carve a {}x{} maze: width and height must be odd, at least 3, \
                     and not both 3", width, height)
        }
        InvalidLevel(level: u32) {
            description("invalid level")
            display("level {} is not part of the level table", level)
        }
    }
}

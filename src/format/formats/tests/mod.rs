//! Unit tests for the exporters.
//!
//! These tests export real files into temporary directories and read them
//! back to check the produced artifacts.

mod label_map_tests;
mod yolo_zip_tests;

pub mod layout_test;

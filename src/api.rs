pub mod elpris;

pub mod kicad_mod;
pub mod sexpr;

//! Alias records and their argument templates
//!
//! An alias maps a dot-path name to a program and a fixed list of arguments. The
//! argument list may contain pipe markers (`|` on its own, or `|prog`) which split
//! the alias into several processes. Templates are parsed once into
//! [`template::TemplateToken`]s when an alias is defined or loaded, so execution
//! never has to re-inspect the raw strings.

pub mod command;
pub mod template;

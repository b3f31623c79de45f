use qif_core::Document;
use serde::Serialize;
use std::{io, io::Write};
use thiserror::Error;


/// Renders values as indented (two spaces) JSON.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct JsonRenderer {}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Writes `doc` as indented JSON followed by a newline.
pub fn render<W: Write>(w: &mut W, doc: &Document) -> Result<(), RenderError> {
    JsonRenderer::default().render(doc, w)
}

pub fn to_json_string(doc: &Document) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("an io error occurred")]
    Io(#[from] io::Error),
    #[error("could not serialize the document")]
    Json(#[from] serde_json::Error),
}

pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

impl<'a, T: Serialize + ?Sized, W: Write> Renderer<&'a T, W> for JsonRenderer {
    type Error = RenderError;
    fn render(&self, renderable: &'a T, write: &mut W) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut *write, renderable).map_err(|e| {
            if e.is_io() {
                RenderError::Io(e.into())
            } else {
                RenderError::Json(e)
            }
        })?;
        writeln!(write)?;
        Ok(())
    }
}

use log::debug;
use thiserror::Error;

use mml2tex::{ConversionError, Converter};
use mml2tex_tree::{ReadError, extract_processing_instruction, read_mathml};

use crate::config_file::{OutputFormat, Wrap};

/// Target of the processing instruction that carries a result.
pub const PI_TARGET: &str = "mml2tex";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read MathML: {0}")]
    Read(#[from] ReadError),
    #[error("conversion error: {0}")]
    Convert(#[from] ConversionError),
    #[error("TeX output contains `?>` and cannot be stored in a processing instruction")]
    UnterminablePi,
}

/// Read, render and serialize one document. The first failing stage ends the run.
pub struct Pipeline {
    converter: Converter,
    output: OutputFormat,
    wrap: Wrap,
}

impl Pipeline {
    pub fn new(converter: Converter, output: OutputFormat, wrap: Wrap) -> Self {
        Pipeline {
            converter,
            output,
            wrap,
        }
    }

    pub fn run(&self, xml: &str) -> Result<String, PipelineError> {
        let tree = read_mathml(xml)?;
        debug!("read <{}> with {} children", tree.name, tree.children.len());
        let tex = self.converter.render(&tree)?;
        self.serialize(&tex)
    }

    fn serialize(&self, tex: &str) -> Result<String, PipelineError> {
        let wrapped = match self.wrap {
            Wrap::None => tex.to_string(),
            Wrap::Inline => format!("${tex}$"),
            Wrap::Display => format!(r"\[{tex}\]"),
        };
        match self.output {
            OutputFormat::Tex => Ok(wrapped),
            OutputFormat::ProcessingInstruction if wrapped.contains("?>") => {
                Err(PipelineError::UnterminablePi)
            }
            OutputFormat::ProcessingInstruction => Ok(format!("<?{PI_TARGET} {wrapped}?>")),
        }
    }
}

/// Return the TeX stored in a document by an earlier run with processing-instruction output.
pub fn read_back(xml: &str) -> Result<Option<String>, ReadError> {
    extract_processing_instruction(xml, PI_TARGET)
}

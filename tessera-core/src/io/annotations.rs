// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::TesseraError;
use crate::geom::Annotation;

/// Write patch annotations to a yolo segmentation label file
///
/// One line is written per annotation. An empty slice produces an empty
/// file so every patch image has a matching label file.
///
/// # Arguments
///
/// * `path` - Output label file
/// * `annotations` - Annotations in label order
pub fn write_annotations<P: AsRef<Path>>(
    path: P,
    annotations: &[Annotation],
) -> Result<(), TesseraError> {
    let file = File::create(path).map_err(|_| TesseraError::LabelsWriteError)?;
    let mut writer = BufWriter::new(file);

    for annotation in annotations.iter() {
        writeln!(writer, "{}", annotation.to_line()).map_err(|_| TesseraError::LabelsWriteError)?;
    }

    writer.flush().map_err(|_| TesseraError::LabelsWriteError)
}

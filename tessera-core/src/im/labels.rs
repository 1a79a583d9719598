// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TesseraError;

/// A single polygon label from a yolo segmentation label file
///
/// The raw line is retained so dropped labels can be reported verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    class_id: String,
    points: Vec<[f64; 2]>,
    raw: String,
}

impl Label {
    /// Initialize a new label from a class and at least three (x, y) vertices
    pub fn new(
        class_id: &str,
        points: Vec<[f64; 2]>,
        raw: &str,
    ) -> Result<Self, TesseraError> {
        if points.len() < 3 {
            return Err(TesseraError::LabelsReadError(format!(
                "A polygon needs at least 3 points: {}",
                raw
            )));
        }

        Ok(Self {
            class_id: class_id.to_string(),
            points,
            raw: raw.to_string(),
        })
    }

    /// Parse one `<class_id> <x1> <y1> ... <xn> <yn>` line
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::im::Label;
    ///
    /// let label = Label::parse("0 0.1 0.1 0.5 0.1 0.5 0.5").unwrap();
    /// assert_eq!(label.class_id(), "0");
    /// assert_eq!(label.len(), 3);
    ///
    /// assert!(Label::parse("0 0.1 0.1 0.5").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, TesseraError> {
        let line = line.trim();
        let mut tokens = line.split_whitespace();

        let class_id = tokens
            .next()
            .ok_or_else(|| TesseraError::LabelsReadError("Empty label line".to_string()))?;

        let values = tokens
            .map(|token| token.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| {
                TesseraError::LabelsReadError(format!("Non-numeric coordinate in: {}", line))
            })?;

        if values.len() % 2 != 0 {
            return Err(TesseraError::LabelsReadError(format!(
                "Odd number of coordinates in: {}",
                line
            )));
        }

        let points = values
            .chunks_exact(2)
            .map(|xy| [xy[0], xy[1]])
            .collect::<Vec<[f64; 2]>>();

        Self::new(class_id, points, line)
    }
}

// >>> PROPERTY METHODS

impl Label {
    /// Class identifier of the polygon
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Original label line
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of polygon vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon has no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Return a reference to the polygon vertices
    pub fn as_points(&self) -> &[[f64; 2]] {
        &self.points
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl Label {
    /// Scale normalized vertices to absolute pixel coordinates
    ///
    /// # Arguments
    ///
    /// * `width` - Width of the source image (not the padded canvas)
    /// * `height` - Height of the source image (not the padded canvas)
    pub fn to_absolute(&self, width: u32, height: u32) -> Label {
        let width = width as f64;
        let height = height as f64;

        Label {
            class_id: self.class_id.clone(),
            points: self
                .points
                .iter()
                .map(|&[x, y]| [x * width, y * height])
                .collect(),
            raw: self.raw.clone(),
        }
    }
}

// <<< TRANSFORM METHODS

/// A container of polygon labels for one source image
///
/// # Examples
///
/// ```
/// use tessera_core::im::Labels;
///
/// let labels = Labels::parse("0 0 0 1 0 1 1\n\n2 0 0 0.5 0 0.5 0.5 0 0.5\n").unwrap();
/// assert_eq!(labels.len(), 2);
/// assert_eq!(labels.as_labels()[1].len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    data: Vec<Label>,
}

impl Labels {
    /// Initialize a new labels container
    pub fn new(data: Vec<Label>) -> Self {
        Self { data }
    }

    /// Parse the contents of a label file, skipping blank lines
    pub fn parse(contents: &str) -> Result<Self, TesseraError> {
        let data = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Label::parse)
            .collect::<Result<Vec<Label>, _>>()?;

        Ok(Self { data })
    }
}

// >>> I/O METHODS

impl Labels {
    /// Open labels from the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a yolo segmentation label file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tessera_core::im::Labels;
    /// let labels = Labels::open("labels/train/image.txt");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Labels, TesseraError> {
        let mut contents = String::new();

        File::open(&path)
            .map_err(|err| TesseraError::NoFileError(err.to_string()))?
            .read_to_string(&mut contents)
            .map_err(|err| TesseraError::NoFileError(err.to_string()))?;

        Self::parse(&contents)
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl Labels {
    /// Return the number of stored labels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no labels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the underlying labels
    pub fn as_labels(&self) -> &[Label] {
        &self.data
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl Labels {
    /// Scale every label to absolute pixel coordinates of the source image
    pub fn to_absolute(&self, width: u32, height: u32) -> Labels {
        Labels {
            data: self
                .data
                .iter()
                .map(|label| label.to_absolute(width, height))
                .collect(),
        }
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    pub fn test_parse_line() {
        let label = Label::parse("3 0.25 0.5 0.75 0.5 0.75 1.0 0.25 1.0").unwrap();

        assert_eq!(label.class_id(), "3");
        assert_eq!(
            label.as_points(),
            &[[0.25, 0.5], [0.75, 0.5], [0.75, 1.0], [0.25, 1.0]]
        );
        assert_eq!(label.raw(), "3 0.25 0.5 0.75 0.5 0.75 1.0 0.25 1.0");
    }

    #[test]
    pub fn test_parse_line_failures() {
        assert!(Label::parse("").is_err());
        assert!(Label::parse("0 0.1 0.2 0.3 0.4").is_err());
        assert!(Label::parse("0 0.1 0.2 0.3 0.4 0.5").is_err());
        assert!(Label::parse("0 0.1 0.2 0.3 x 0.5 0.6").is_err());
    }

    #[test]
    pub fn test_parse_ignores_blank_lines() {
        let labels = Labels::parse("\n0 0 0 1 0 1 1\n   \n").unwrap();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    pub fn test_parse_propagates_errors() {
        assert!(Labels::parse("0 0 0 1 0 1 1\n1 0 0\n").is_err());
    }

    #[test]
    pub fn test_to_absolute() {
        let labels = Labels::parse("0 0.5 0.25 1.0 0.25 1.0 1.0").unwrap();
        let absolute = labels.to_absolute(200, 100);

        assert_eq!(
            absolute.as_labels()[0].as_points(),
            &[[100.0, 25.0], [200.0, 25.0], [200.0, 100.0]]
        );
        assert_eq!(absolute.as_labels()[0].raw(), labels.as_labels()[0].raw());
    }

    #[test]
    pub fn test_open_failure() {
        assert!(Labels::open("does_not_exist.txt").is_err());
    }

    #[test]
    pub fn test_open_file() {
        const FILE: &str = "TEST_LABELS_OPEN.txt";

        std::fs::write(FILE, "1 0.1 0.1 0.2 0.1 0.2 0.2\n2 0 0 1 0 1 1 0 1\n").unwrap();

        let labels = Labels::open(FILE).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.as_labels()[1].class_id(), "2");

        std::fs::remove_file(FILE).unwrap();
    }
}

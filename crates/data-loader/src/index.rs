//! Building a DataIndex from the artifact directory.
//!
//! Loading runs in three steps:
//! - parse movies.dat and similarity.dat in parallel
//! - check that the two agree (size, ids, finite values)
//! - build the title and id lookups

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

/// Name of the catalog artifact inside the data directory
pub const MOVIES_FILE: &str = "movies.dat";

/// Name of the similarity artifact inside the data directory
pub const SIMILARITY_FILE: &str = "similarity.dat";

impl DataIndex {
    /// Load the catalog and similarity matrix from a directory.
    ///
    /// Fails on a missing file, a malformed line, a duplicate movie id,
    /// a non-finite similarity, or a size mismatch between the two files.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading artifacts from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let similarity_path = data_dir.join(SIMILARITY_FILE);

        // The matrix is by far the larger file; parse both at once
        let (catalog, matrix) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_similarity(&similarity_path),
        );
        let catalog = catalog?;
        let matrix = matrix?;

        info!(
            "Loaded {} movies and a {}x{} similarity matrix",
            catalog.len(),
            matrix.size(),
            matrix.size()
        );

        let index = DataIndex::new(catalog, matrix)?;
        index.log_asymmetry();
        Ok(index)
    }

    /// Largest |m[i][j] - m[j][i]| over the matrix.
    ///
    /// Matrices exported from float pipelines are only near-symmetric, so
    /// this is reported rather than enforced.
    pub fn max_asymmetry(&self) -> f32 {
        let n = self.matrix.size();
        let mut worst = 0.0f32;
        for i in 0..n {
            for j in (i + 1)..n {
                if let (Some(a), Some(b)) = (self.matrix.get(i, j), self.matrix.get(j, i)) {
                    worst = worst.max((a - b).abs());
                }
            }
        }
        worst
    }

    fn log_asymmetry(&self) {
        let asym = self.max_asymmetry();
        if asym > 1e-3 {
            tracing::warn!("Similarity matrix is not symmetric (max deviation {:.4})", asym);
        } else {
            tracing::debug!("Similarity matrix max asymmetry {:.6}", asym);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataLoadError;
    use std::fs;

    fn write_artifacts(dir: &Path, movies: &str, similarity: &str) {
        fs::write(dir.join(MOVIES_FILE), movies).unwrap();
        fs::write(dir.join(SIMILARITY_FILE), similarity).unwrap();
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "1::Alpha\n2::Beta\n3::Gamma\n",
            "1.0 0.8 0.1\n0.8 1.0 0.3\n0.1 0.3 1.0\n",
        );

        let index = DataIndex::load_from_files(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.matrix().get(0, 1), Some(0.8));
        assert_eq!(index.find_by_title("beta"), Some(1));
        assert_eq!(index.max_asymmetry(), 0.0);
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MOVIES_FILE), "1::Alpha\n").unwrap();

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        match err {
            DataLoadError::FileNotFound { path } => assert!(path.ends_with(SIMILARITY_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "1::Alpha\n2::Beta\n3::Gamma\n", "1.0 0.5\n0.5 1.0\n");

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::DimensionMismatch { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "1::Alpha\n2::Beta\n", "1.0 0.5\n0.5\n");

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_non_utf8_similarity_names_file_and_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MOVIES_FILE), "1::Alpha\n2::Beta\n").unwrap();
        fs::write(dir.path().join(SIMILARITY_FILE), b"1.0 0.5\n0.5 \xff1.0\n").unwrap();

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, SIMILARITY_FILE);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "1::Alpha\n2::Beta\n", "1.0 NaN\n0.5 1.0\n");

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::NonFiniteValue { row: 0, col: 1 }));
    }

    #[test]
    fn test_asymmetry_measured() {
        let catalog = Catalog::new(vec![
            Movie { id: 1, title: "A".to_string() },
            Movie { id: 2, title: "B".to_string() },
        ])
        .unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.25, 1.0]]).unwrap();
        let index = DataIndex::new(catalog, matrix).unwrap();

        assert!((index.max_asymmetry() - 0.25).abs() < 1e-6);
    }
}

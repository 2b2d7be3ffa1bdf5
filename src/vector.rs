//! Vectors.

use std::num::NonZeroUsize;

use crate::error::Error;

/// Set of vectors of the same size.
pub trait VectorSet<T> {
    /// Vector type.
    ///
    /// Supposed to be a slice or a Vec.
    type Vector: ?Sized;

    /// Returns the number of vectors in the set.
    fn len(&self) -> usize;

    /// Returns the size of each vector.
    fn vector_size(&self) -> usize;

    /// Returns the i-th vector.
    fn get(&self, i: usize) -> &Self::Vector;
}

/// Vectors in a contiguous array.
#[derive(Clone, Debug)]
pub struct BlockVectorSet<T> {
    data: Vec<T>,

    /// Vector size.
    pub vector_size: usize,
}

impl<T> BlockVectorSet<T> {
    /// Tries to chunk a given `Vec`.
    ///
    /// Fails if `data.len` is not a multiple of `vector_size`.
    pub fn chunk(
        data: Vec<T>,
        vector_size: NonZeroUsize,
    ) -> Result<Self, Error> {
        let m = vector_size.get();
        if data.is_empty() || data.len() % m == 0 {
            Ok(Self {
                data,
                vector_size: m,
            })
        } else {
            Err(Error::InvalidInput(format!(
                "data size ({}) is not a multiple of vector size ({})",
                data.len(),
                vector_size,
            )))
        }
    }

    /// Returns the number of vectors in the vector set.
    pub fn len(&self) -> usize {
        self.data.len() / self.vector_size
    }

    /// Returns the size of each vector in the vector set.
    pub const fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Returns the i-th vector in the vector set.
    ///
    /// Panics if `i` is out of bounds.
    pub fn get(&self, i: usize) -> &[T] {
        let from = i * self.vector_size;
        let to = from + self.vector_size;
        &self.data[from..to]
    }

    /// Returns the mutable i-th vector.
    pub fn get_mut(&mut self, i: usize) -> &mut [T] {
        let from = i * self.vector_size;
        let to = from + self.vector_size;
        &mut self.data[from..to]
    }
}

impl<T> VectorSet<T> for BlockVectorSet<T> {
    type Vector = [T];

    fn len(&self) -> usize {
        self.len()
    }

    fn vector_size(&self) -> usize {
        self.vector_size()
    }

    fn get(&self, i: usize) -> &Self::Vector {
        self.get(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_vector_set_can_chunk_10_elements_into_5_vectors_of_2_elements() {
        let v: Vec<f32> = vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
        ];
        let vs = BlockVectorSet::chunk(v, 2.try_into().unwrap()).unwrap();
        assert_eq!(vs.vector_size(), 2);
        assert_eq!(vs.len(), 5);
        assert_eq!(vs.get(0), &[1.0, 2.0]);
        assert_eq!(vs.get(1), &[3.0, 4.0]);
        assert_eq!(vs.get(2), &[5.0, 6.0]);
        assert_eq!(vs.get(3), &[7.0, 8.0]);
        assert_eq!(vs.get(4), &[9.0, 10.0]);
    }

    #[test]
    fn block_vector_set_can_chunk_empty_vec() {
        let vs = BlockVectorSet::chunk(
            Vec::<f32>::new(),
            10.try_into().unwrap(),
        ).unwrap();
        assert_eq!(vs.vector_size(), 10);
        assert_eq!(vs.len(), 0);
    }

    #[test]
    fn block_vector_set_cannot_chunk_10_elements_by_vectors_of_3_elements() {
        let v: Vec<f32> = vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
        ];
        assert!(BlockVectorSet::chunk(v, 3.try_into().unwrap()).is_err())
    }
}

use crate::Coordinate;

/// `Vec<T>` that represents a square 2D field, addressed by `Coordinate`
#[derive(Clone, Default)]
pub struct Field<T> {
    data: Vec<T>,
    size: u32,
}

impl<T> Field<T> {
    /// Constructs a `size` by `size` field, filling each slot with `f(coordinate)`.
    /// Slots are generated in row-major order.
    pub fn try_from_fn<E, F>(size: u32, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Coordinate) -> Result<T, E>,
    {
        let mut data = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size {
            for x in 0..size {
                data.push(f(Coordinate::new(x, y))?);
            }
        }
        Ok(Self { data, size })
    }

    /// Returns the side length of the field.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the index of a coordinate, or `None` if it lies outside the field.
    pub fn index_of(&self, at: Coordinate) -> Option<usize> {
        if at.x < self.size && at.y < self.size {
            Some(self.size as usize * at.y as usize + at.x as usize)
        } else {
            None
        }
    }

    /// Returns the coordinate of an index in the field.
    pub fn locate(&self, index: usize) -> Coordinate {
        let size = self.size as usize;
        Coordinate::new((index % size) as u32, (index / size) as u32)
    }

    /// Returns a reference to the element at `at`.
    pub fn peek(&self, at: Coordinate) -> Option<&T> {
        self.index_of(at).and_then(|i| self.data.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> Field<T>
where
    T: Copy,
{
    /// Returns a copy of the element at `at`.
    pub fn get(&self, at: Coordinate) -> Option<T> {
        self.peek(at).copied()
    }
}

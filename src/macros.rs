#![macro_use]

macro_rules! impl_element {
    ($type: ty, $integer: expr) => {
        impl crate::traits::Element for $type {
            const IS_INTEGER: bool = $integer;

            #[inline]
            fn as_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $type
            }
        }
    };
}

macro_rules! impl_elementwise_assign {
    ($op: ident, $fn: ident, $method: ident) => {
        impl<T: Element> std::ops::$op<&DenseMatrix<T>> for DenseMatrix<T> {
            fn $fn(&mut self, other: &DenseMatrix<T>) {
                self.$method(other);
            }
        }

        impl<T: Element> std::ops::$op<DenseMatrix<T>> for DenseMatrix<T> {
            fn $fn(&mut self, other: DenseMatrix<T>) {
                self.$method(&other);
            }
        }
    };
}

macro_rules! impl_elementwise_binary {
    ($op: ident, $fn: ident, $method: ident) => {
        impl<T: Element> std::ops::$op<&DenseMatrix<T>> for &DenseMatrix<T> {
            type Output = DenseMatrix<T>;
            fn $fn(self, other: &DenseMatrix<T>) -> Self::Output {
                let mut rv = self.clone();
                rv.$method(other);
                rv
            }
        }

        impl<T: Element> std::ops::$op<DenseMatrix<T>> for DenseMatrix<T> {
            type Output = DenseMatrix<T>;
            fn $fn(mut self, other: DenseMatrix<T>) -> Self::Output {
                self.$method(&other);
                self
            }
        }
    };
}

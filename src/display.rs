use crate::matrix::DenseMatrix;
use crate::traits::Element;
use std::fmt::Write;

// printf("%g")-style rendering: `digits` significant digits,
// trailing zeros removed.
fn format_general(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(e) => (m.to_string(), e),
            Err(_) => return sci,
        },
        None => return sci,
    };
    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(&mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Write a human-readable dump in blocks of `block` columns.
    ///
    /// A `block` of zero writes every column in a single block.
    /// Each block after the first is preceded by a
    /// ` ----- first last ------ ` header line.
    pub fn write_blocks<W: Write>(&self, out: &mut W, block: usize) -> std::fmt::Result {
        let ny = self.cols();
        let block = if block > 0 { block } else { ny };
        let mut last = 0;
        loop {
            let first = last;
            last = (last + block).min(ny);
            if first > 0 {
                writeln!(out, " ----- {first} {last} ------ ")?;
            }
            for i in 0..self.rows() {
                for v in &self.row(i)[first..last] {
                    write!(out, "{v:>10.4e}  ")?;
                }
                writeln!(out)?;
            }
            if last >= ny {
                break;
            }
        }
        Ok(())
    }

    /// All elements, row-major, separated by single spaces.
    ///
    /// Floating point values keep six significant digits.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_rows(&[[1.0, 0.5], [1.0 / 3.0, 2.0e7]]).unwrap();
    /// assert_eq!(m.to_compact_string(), "1 0.5 0.333333 2e+07 ");
    /// ```
    pub fn to_compact_string(&self) -> String {
        let mut rv = String::new();
        for &v in self.as_slice() {
            if T::IS_INTEGER {
                rv.push_str(&v.to_string());
            } else {
                rv.push_str(&format_general(v.as_f64(), 6));
            }
            rv.push(' ');
        }
        rv
    }

    /// Print the unblocked dump to standard output.
    pub fn print(&self) {
        let mut buffer = String::new();
        if self.write_blocks(&mut buffer, 0).is_ok() {
            print!("{buffer}");
        }
    }
}

impl<T: Element> std::fmt::Display for DenseMatrix<T> {
    /// The dump of [`DenseMatrix::write_blocks`] with 10 columns per block.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_blocks(f, 10)
    }
}

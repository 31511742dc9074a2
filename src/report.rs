// Text reports over a field and a curve.
use crate::curve::Curve;
use crate::field::PrimeField;
use crate::point::{GroupElement, Point};
use anyhow::Result;
use std::fmt::Display;
use std::io::Write;

pub struct Report<W: Write> {
    out: W,
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_infos(&mut self, field: &PrimeField, curve: &Curve) -> Result<()> {
        writeln!(self.out, "{}", field)?;
        writeln!(self.out, "{}", curve)?;
        Ok(())
    }

    /// Prints and returns the points of the curve.
    pub fn print_valid_points(&mut self, field: &PrimeField, curve: &Curve) -> Result<Vec<Point>> {
        let points = curve.curve_points(field);
        writeln!(self.out, "{} valid points : {}", points.len(), join(&points))?;
        Ok(points)
    }

    /// Banner, points, then the order and sequence of every point.
    pub fn print_all_groups(&mut self, field: &PrimeField, curve: &Curve) -> Result<()> {
        self.print_infos(field, curve)?;
        self.print_valid_points(field, curve)?;
        for group in curve.subgroups(field)? {
            writeln!(
                self.out,
                "origin : {} / order : {} / sequence : {}",
                group.origin.point(),
                group.order(),
                join(&group.elements)
            )?;
        }
        Ok(())
    }

    pub fn print_group(&mut self, field: &PrimeField, curve: &Curve, origin: Point) -> Result<()> {
        self.print_infos(field, curve)?;
        self.print_valid_points(field, curve)?;
        let origin = GroupElement::origin(origin, field, curve)?;
        let (sequence, order) = curve.cyclic_subgroup(&origin, field)?;
        writeln!(
            self.out,
            "origin : {} / order : {} / sequence : {}",
            origin,
            order,
            join(&sequence)
        )?;
        Ok(())
    }
}

#[cfg(test)]
fn output(f: impl FnOnce(&mut Report<Vec<u8>>) -> Result<()>) -> String {
    let mut report = Report::new(vec![]);
    f(&mut report).unwrap();
    String::from_utf8(report.into_inner()).unwrap()
}

#[test]
fn test_print_valid_points() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let text = output(|r| r.print_valid_points(&field, &curve).map(|_| ()));
    assert_eq!(
        text,
        "12 valid points : (Inf,Inf) (2,2) (2,9) (3,1) (3,10) (4,4) (4,7) (5,0) (6,5) (6,6) (7,3) (7,8)\n"
    );
}

#[test]
fn test_print_group() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let text = output(|r| r.print_group(&field, &curve, Point::new(5, 0)));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ECGroup : prime = 11");
    assert_eq!(lines[1], "ECCurve : y^2 = x^3 + 7");
    assert_eq!(
        lines[3],
        "origin : (5,0).1 / order : 2 / sequence : (Inf,Inf).0 (5,0).1"
    );
}

#[test]
fn test_print_group_invalid_origin() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let mut report = Report::new(vec![]);
    assert!(report.print_group(&field, &curve, Point::new(1, 1)).is_err());
}

#[test]
fn test_print_all_groups() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let text = output(|r| r.print_all_groups(&field, &curve));
    let lines: Vec<&str> = text.lines().collect();
    // banner, points, one line per point.
    assert_eq!(lines.len(), 3 + 12);
    assert_eq!(lines[3], "origin : (Inf,Inf) / order : 1 / sequence : (Inf,Inf).0");
    assert!(lines[8].starts_with("origin : (4,4) / order : 12 / sequence : (Inf,Inf).0 (4,4).1 (6,6).2"));
}

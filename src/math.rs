#![allow(dead_code)]
#![allow(unused_macros)]
#![macro_use]

pub use ndarray::{Array1,Array2,ArrayView1,ArrayView2,Axis};
pub use serde::{Serialize,Deserialize};
use std::fmt::{Display,Formatter};

pub fn abs<T:num::traits::real::Real>(x:T)->T { x.abs() }
pub fn cos<T:num::traits::real::Real>(x:T)->T { x.cos() }
pub fn sin<T:num::traits::real::Real>(x:T)->T { x.sin() }
pub fn sqrt<T:num::traits::real::Real>(x:T)->T { x.sqrt() }
pub fn cbrt<T:num::traits::real::Real>(x:T)->T { x.cbrt() }
pub fn min<T:num::traits::real::Real>(x:T,y:T)->T { x.min(y) }
pub fn max<T:num::traits::real::Real>(x:T,y:T)->T { x.max(y) }
pub fn sq<T:num::traits::real::Real>(x:T)->T { x*x }
pub fn cube<T:num::traits::real::Real>(x:T)->T { x*x*x }
pub const PI:f64 = std::f64::consts::PI;
pub const EPSILON:f64 = std::f64::EPSILON;

pub type Real = f64;

pub trait Realable {
    fn real(&self)->Real;
}

impl Realable for u64 {
    fn real(&self)->Real {
        *self as Real
    }
}

impl Realable for usize {
    fn real(&self)->Real {
        *self as Real
    }
}

pub fn real<T:Realable>(x:T)->Real {
    x.real()
}

pub fn close_enough(x:f64,y:f64,tol:f64)->bool {
    let ax = abs(x);
    let ay = abs(y);
    let a = if ax>ay { ax } else { ay };
    let e = abs(x-y);
    let e = if a > tol { e/a } else { e };
    e < tol
}

#[macro_export]
macro_rules! assert_close {
    ($x:expr,$y:expr,$tol:expr) => {
        if !$crate::math::close_enough($x,$y,$tol) {
            println!("Tolerance failure: |{:.6e} - {:.6e}| @ {:.6e}",$x,$y,$tol);
            panic!("Tolerance failure");
        }
    }
}

use std::ops::{Add,Sub,Mul,Div,Neg,Index,IndexMut};

#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
pub struct Real3(pub [Real;3]);

pub fn r3(x:Real,y:Real,z:Real)->Real3 { Real3::make([x,y,z]) }

impl Display for Real3 {
    fn fmt(&self,fmt:&mut Formatter)->Result<(),std::fmt::Error> {
	write!(fmt,"{:+.17e} {:+.17e} {:+.17e}",
		self[0],
		self[1],
		self[2])
    }
}

impl Neg for Real3 {
    type Output = Real3;
    fn neg(self)->Self { let Real3([x,y,z]) = self; r3(-x,-y,-z) }
}

impl Add for Real3 {
    type Output = Real3;
    fn add(self,Real3([x2,y2,z2]):Self)->Self { let Real3([x1,y1,z1]) = self; r3(x1+x2,y1+y2,z1+z2) }
}

impl Sub for Real3 {
    type Output = Real3;
    fn sub(self,Real3([x2,y2,z2]):Self)->Self { let Real3([x1,y1,z1]) = self; r3(x1-x2,y1-y2,z1-z2) }
}

impl Mul<Real3> for Real {
    type Output = Real3;
    fn mul(self,Real3([x,y,z]):Real3)->Real3 { r3(self*x,self*y,self*z) }
}

impl Div<Real> for Real3 {
    type Output = Real3;
    fn div(self,k:Real)->Real3 {
        let Real3([x,y,z]) = self;
        r3(x/k,y/k,z/k)
    }
}

impl Index<usize> for Real3 {
    type Output = Real;
    fn index(&self, i:usize) -> &Self::Output {
        let Real3(u) = self;
        &u[i]
    }
}

impl IndexMut<usize> for Real3 {
    fn index_mut(&mut self, i:usize) -> &mut Self::Output {
        let Real3(u) = self;
        &mut u[i]
    }
}

impl From<Real3> for (Real,Real,Real) {
    fn from(Real3([x,y,z]):Real3)->Self { (x,y,z) }
}

impl Real3 {
    pub fn zero()->Self { Real3([0.0;3]) }
    pub fn make(u:[Real;3])->Self { Real3(u) }
    pub fn dot(self,Real3([x2,y2,z2]):Self)->Real {
        let Real3([x1,y1,z1]) = self;
        x1*x2+y1*y2+z1*z2
    }
    pub fn norm2sq(self)->Real { self.dot(self) }
    pub fn norm2(self)->Real { sqrt(self.norm2sq()) }
    pub fn scale(self,k:Real)->Self {
        let Real3([x,y,z]) = self;
        r3(k*x,k*y,k*z)
    }
    pub fn is_finite(self)->bool {
	self.0.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
#[test]
fn test_vector() {
    let x = Real3::make([-1.0,2.0,3.5]);
    let mut y = Real3::zero();
    y[0] = 1.5;
    y[1] = -2.0;
    y[2] = 0.5;
    assert_eq!(x + y,r3(0.5,0.0,4.0));
    assert_eq!(x - y,r3(-2.5,4.0,3.0));
    assert_eq!(-y,r3(-1.5,2.0,-0.5));
    assert_close!(x.dot(y),-1.5 - 4.0 + 1.75,1e-15);
    assert_close!(r3(3.0,4.0,12.0).norm2(),13.0,1e-15);
    assert_eq!((r3(2.0,4.0,6.0)/2.0).scale(3.0),r3(3.0,6.0,9.0));
    let (a,b,c) : (Real,Real,Real) = x.into();
    assert_eq!([a,b,c],[-1.0,2.0,3.5]);
}

#[cfg(test)]
#[test]
fn test_close_enough() {
    assert!(close_enough(1.0,1.0 + 1e-12,1e-9));
    assert!(!close_enough(1.0,1.1,1e-9));
    assert!(close_enough(0.0,1e-12,1e-9));
    assert!(!Real3::make([0.0,NAN,0.0]).is_finite());
}

#[cfg(test)]
const NAN:f64 = std::f64::NAN;

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only lookups over the store tables.

pub mod empresas;
pub mod expedientes;
pub mod resoluciones;
